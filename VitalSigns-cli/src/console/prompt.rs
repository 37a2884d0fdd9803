use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Outcome of asking for a typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Answer<T> {
    /// The input parsed
    Value(T),
    /// The input did not parse; holds the raw text
    Invalid(String),
    /// Input is exhausted
    Closed,
}

/// Line-oriented prompt over any buffered reader
pub struct Prompt<R> {
    input: R,
    buffer: String,
}

impl<R: BufRead> Prompt<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buffer: String::new(),
        }
    }

    /// Print `message` and read one trimmed line, `None` at end of input
    pub fn ask<W: Write>(&mut self, out: &mut W, message: &str) -> io::Result<Option<String>> {
        write!(out, "{}", message)?;
        out.flush()?;

        self.buffer.clear();
        if self.input.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buffer.trim().to_string()))
    }

    /// Print `message` and parse the answer as `T`
    pub fn ask_parsed<T: FromStr, W: Write>(
        &mut self,
        out: &mut W,
        message: &str,
    ) -> io::Result<Answer<T>> {
        Ok(match self.ask(out, message)? {
            None => Answer::Closed,
            Some(text) => match text.parse::<T>() {
                Ok(value) => Answer::Value(value),
                Err(_) => Answer::Invalid(text),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ask_trims_and_detects_end() {
        let mut prompt = Prompt::new(Cursor::new("  7 \r\n"));
        let mut out = Vec::new();

        assert_eq!(prompt.ask(&mut out, "Choice: ").unwrap(), Some("7".to_string()));
        assert_eq!(prompt.ask(&mut out, "Choice: ").unwrap(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "Choice: Choice: ");
    }

    #[test]
    fn test_ask_parsed() {
        let mut prompt = Prompt::new(Cursor::new("12\nabc\n"));
        let mut out = Vec::new();

        assert_eq!(prompt.ask_parsed::<i32, _>(&mut out, "").unwrap(), Answer::Value(12));
        assert_eq!(
            prompt.ask_parsed::<i32, _>(&mut out, "").unwrap(),
            Answer::Invalid("abc".to_string())
        );
        assert_eq!(prompt.ask_parsed::<i32, _>(&mut out, "").unwrap(), Answer::Closed);
    }
}
