//! Line-oriented terminal input

use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub(crate) struct LineInput {
    lines: Lines<BufReader<Stdin>>,
}

impl LineInput {
    pub(crate) fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `prompt` and read one line; `None` at end of input
    pub(crate) async fn read(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}
