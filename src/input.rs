use std::io::{self, BufRead, Write};

/// Source of interactive input. Jobs with a prompt read exactly one line.
pub trait InputSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

/// Prompts on stdout and reads a line from stdin.
#[derive(Debug, Default)]
pub struct Stdin;

impl InputSource for Stdin {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed before a line was entered",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Always answers with the same value.
#[derive(Clone, Debug)]
pub struct Fixed(pub String);

impl Fixed {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl InputSource for Fixed {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        tracing::debug!("answering `{}` with `{}`", prompt.trim(), self.0);
        Ok(self.0.clone())
    }
}

/// For runs where no job should prompt.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no input available for prompt `{}`", prompt.trim()),
        ))
    }
}
