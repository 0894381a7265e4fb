use anyhow::Result;
use serde::Serialize;
use std::fmt::Display;

/// Prints a view model as pretty JSON or through its `Display` impl.
pub struct ConsoleRenderer {
    json_mode: bool,
}

impl ConsoleRenderer {
    pub fn new(json_mode: bool) -> Self {
        Self { json_mode }
    }

    pub fn render<T>(&self, content: &T) -> Result<()>
    where
        T: Serialize + Display,
    {
        if self.json_mode {
            println!("{}", serde_json::to_string_pretty(content)?);
        } else {
            print!("{}", content);
        }
        Ok(())
    }
}
