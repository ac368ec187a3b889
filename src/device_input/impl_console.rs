use crate::device_input::interface::{DeviceInput, InputEvent};
use crate::library::logger::interface::Logger;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

const HELP: &str =
    "commands: open <path> | consent on|off | classify | <enter> | ok | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Input(InputEvent),
    Quit,
    Help,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Some(Command::Input(InputEvent::EnterPressed));
    }

    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    match (command.to_lowercase().as_str(), argument) {
        ("open", path) if !path.is_empty() => Some(Command::Input(InputEvent::ImageSelected(
            PathBuf::from(path),
        ))),
        ("consent", "on" | "yes" | "true") => {
            Some(Command::Input(InputEvent::ConsentChanged(true)))
        }
        ("consent", "off" | "no" | "false") => {
            Some(Command::Input(InputEvent::ConsentChanged(false)))
        }
        ("classify", "") => Some(Command::Input(InputEvent::ClassifyClicked)),
        ("ok", "") => Some(Command::Input(InputEvent::AlertDismissed)),
        ("quit" | "exit", "") => Some(Command::Quit),
        ("help", "") => Some(Command::Help),
        _ => None,
    }
}

pub struct DeviceInputConsole {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceInputConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("input").with_namespace("console"),
        }
    }
}

impl DeviceInput for DeviceInputConsole {
    fn events(&self) -> std::sync::mpsc::Receiver<InputEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            println!("{}", HELP);
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        let _ = logger.error(&format!("Failed to read input: {}", e));
                        break;
                    }
                };

                match parse_command(&line) {
                    Some(Command::Input(event)) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Some(Command::Quit) => break,
                    Some(Command::Help) => println!("{}", HELP),
                    None => {
                        let _ = logger.info(&format!("Unknown command: {}", line.trim()));
                        println!("{}", HELP);
                    }
                }
            }
        });

        rx
    }
}
