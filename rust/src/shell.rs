//! Interactive console session: a main menu for creating users and logging in,
//! and a per-user menu for registering, listing and editing service passwords.
//! Generic over the input and output streams so sessions can be scripted.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::store::{CredentialStore, StoreError};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

const RULE_WIDTH: usize = 50;

/// Whether the caller should keep looping or the input has run out.
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    store: CredentialStore,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, store: CredentialStore) -> Self {
        Self {
            input,
            output,
            store,
        }
    }

    pub fn into_store(self) -> CredentialStore {
        self.store
    }

    /// Runs the main menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            self.banner("Hill Cipher Password Manager")?;
            writeln!(self.output, "1. Create user")?;
            writeln!(self.output, "2. Log in")?;
            writeln!(self.output, "3. Exit")?;

            let Some(choice) = self.prompt("\nChoose an option: ")? else {
                return Ok(());
            };
            let flow = match choice.as_str() {
                "1" => self.create_user()?,
                "2" => self.login()?,
                "3" => {
                    writeln!(self.output, "Exiting... Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "✗ Invalid option! Enter 1, 2 or 3.")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    fn banner(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "\n{rule}\n        {title}\n{rule}")
    }

    /// Prints `label`, reads one line and trims it. `None` means end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>, ShellError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("input closed");
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report(&mut self, err: &StoreError) -> io::Result<()> {
        writeln!(self.output, "✗ Error: {err}")
    }

    fn create_user(&mut self) -> Result<Flow, ShellError> {
        writeln!(self.output, "\n--- Create New User ---")?;
        let Some(identity) = self.prompt("Enter a username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.prompt("Enter a password (letters only): ")? else {
            return Ok(Flow::Quit);
        };

        if identity.is_empty() || password.is_empty() {
            writeln!(self.output, "✗ Username and password cannot be empty!")?;
            return Ok(Flow::Continue);
        }
        match self.store.create_user(&identity, &password) {
            Ok(()) => writeln!(self.output, "✓ User '{identity}' created successfully!")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn login(&mut self) -> Result<Flow, ShellError> {
        writeln!(self.output, "\n--- Log In ---")?;
        let Some(identity) = self.prompt("Enter your username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.prompt("Enter your password: ")? else {
            return Ok(Flow::Quit);
        };

        if identity.is_empty() || password.is_empty() {
            writeln!(self.output, "✗ Username and password cannot be empty!")?;
            return Ok(Flow::Continue);
        }
        match self.store.authenticate(&identity, &password) {
            Ok(true) => {
                writeln!(self.output, "✓ Login successful!")?;
                self.user_menu(&identity)
            }
            Ok(false) => {
                writeln!(self.output, "✗ Incorrect password!")?;
                Ok(Flow::Continue)
            }
            Err(err) => {
                self.report(&err)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn user_menu(&mut self, identity: &str) -> Result<Flow, ShellError> {
        loop {
            self.banner(&format!("Welcome, {identity}!"))?;
            writeln!(self.output, "1. Register a new service password")?;
            writeln!(self.output, "2. Show saved passwords")?;
            writeln!(self.output, "3. Log out")?;

            let Some(choice) = self.prompt("\nChoose an option: ")? else {
                return Ok(Flow::Quit);
            };
            let flow = match choice.as_str() {
                "1" => self.register_service(identity)?,
                "2" => self.show_services(identity)?,
                "3" => {
                    writeln!(self.output, "Logging out...")?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    writeln!(self.output, "✗ Invalid option! Enter 1, 2 or 3.")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                return Ok(Flow::Quit);
            }
        }
    }

    fn register_service(&mut self, identity: &str) -> Result<Flow, ShellError> {
        writeln!(self.output, "\n--- Register New Password ---")?;
        let Some(service) = self.prompt("Enter the service name (e.g. Facebook, Gmail): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.prompt("Enter the password (letters only): ")? else {
            return Ok(Flow::Quit);
        };

        if service.is_empty() || password.is_empty() {
            writeln!(self.output, "✗ Service and password cannot be empty!")?;
            return Ok(Flow::Continue);
        }
        self.store_service(identity, &service, &password)?;
        Ok(Flow::Continue)
    }

    fn store_service(&mut self, identity: &str, service: &str, password: &str) -> io::Result<()> {
        match self.store.set_service_credential(identity, service, password) {
            Ok(ciphertext) => {
                writeln!(self.output, "✓ Password for '{service}' saved successfully!")?;
                writeln!(self.output, "Encrypted password: {ciphertext}")
            }
            Err(err) => self.report(&err),
        }
    }

    /// Prints the listing. Returns `false` when there is nothing to show.
    fn print_services(&mut self, identity: &str) -> io::Result<bool> {
        let entries = match self.store.list_services(identity) {
            Ok(entries) => entries,
            Err(err) => {
                self.report(&err)?;
                return Ok(false);
            }
        };
        if entries.is_empty() {
            writeln!(self.output, "No services registered.")?;
            return Ok(false);
        }

        writeln!(self.output, "\n--- Services for {identity} ---")?;
        for entry in &entries {
            writeln!(self.output, "{}. Service: {}", entry.index, entry.service)?;
            writeln!(self.output, "   Plain password: {}", entry.plaintext.as_str())?;
            writeln!(self.output, "   Encrypted password: {}", entry.ciphertext)?;
            writeln!(self.output, "{}", "-".repeat(40))?;
        }
        Ok(true)
    }

    fn show_services(&mut self, identity: &str) -> Result<Flow, ShellError> {
        writeln!(self.output, "\n--- Saved Passwords ---")?;
        if !self.print_services(identity)? {
            return Ok(Flow::Continue);
        }

        loop {
            writeln!(self.output, "\nOptions:")?;
            writeln!(self.output, "1. Edit a password")?;
            writeln!(self.output, "2. Back to previous menu")?;

            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(Flow::Quit);
            };
            match choice.as_str() {
                "1" => {
                    if let Flow::Quit = self.edit_service(identity)? {
                        return Ok(Flow::Quit);
                    }
                }
                "2" => return Ok(Flow::Continue),
                _ => writeln!(self.output, "✗ Invalid option!")?,
            }
        }
    }

    fn edit_service(&mut self, identity: &str) -> Result<Flow, ShellError> {
        let Some(raw_index) = self.prompt("Enter the number of the service to edit: ")? else {
            return Ok(Flow::Quit);
        };
        let Ok(index) = raw_index.parse::<usize>() else {
            writeln!(self.output, "✗ Enter a valid number!")?;
            return Ok(Flow::Continue);
        };
        let service = match self.store.service_name(identity, index) {
            Ok(service) => service,
            Err(err) => {
                self.report(&err)?;
                return Ok(Flow::Continue);
            }
        };

        let label = format!("Enter the new password for {service} (letters only): ");
        let Some(password) = self.prompt(&label)? else {
            return Ok(Flow::Quit);
        };
        match self.store.edit_service(identity, index, &password) {
            Ok(ciphertext) => {
                writeln!(self.output, "✓ Password for '{service}' saved successfully!")?;
                writeln!(self.output, "Encrypted password: {ciphertext}")?;
                writeln!(self.output, "✓ Password updated successfully!")?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }
}
