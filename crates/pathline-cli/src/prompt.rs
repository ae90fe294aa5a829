//! Interactive prompt backed by the terminal.
//!
//! Input the prompt cannot parse is re-asked; end of input means the
//! user is gone, which aborts the run instead of looping forever.

use std::io::{self, BufRead, Write};

use pathline_match::{ClusterDecision, MatchPrompt, ThresholdDecision};

pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// One trimmed line, or `None` on EOF or a read error.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{question}");
        let _ = self.output.flush();
        self.read_line()
    }

    fn ask_threshold(&mut self) -> ThresholdDecision {
        loop {
            let Some(line) = self.ask("new threshold: ") else {
                return ThresholdDecision::Abort;
            };
            match line.parse::<f64>() {
                Ok(t) if t.is_finite() && t >= 0.0 => return ThresholdDecision::Redraw(t),
                _ => {
                    let _ = writeln!(self.output, "enter a non-negative number");
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> MatchPrompt for ConsolePrompt<R, W> {
    fn next_threshold(&mut self) -> ThresholdDecision {
        loop {
            let Some(line) = self.ask("redraw the dendrogram with a new threshold? [y/N/q] ")
            else {
                return ThresholdDecision::Abort;
            };
            match line.to_ascii_lowercase().as_str() {
                "" | "n" | "no" => return ThresholdDecision::Continue,
                "y" | "yes" => return self.ask_threshold(),
                "q" | "quit" => return ThresholdDecision::Abort,
                _ => {
                    let _ = writeln!(self.output, "answer y, n, or q");
                }
            }
        }
    }

    fn cluster_count(&mut self, n_pathways: usize) -> ClusterDecision {
        loop {
            let Some(line) = self.ask(&format!("number of clusters (1-{n_pathways}): ")) else {
                return ClusterDecision::Abort;
            };
            if matches!(line.to_ascii_lowercase().as_str(), "q" | "quit") {
                return ClusterDecision::Abort;
            }
            match line.parse::<usize>() {
                Ok(k) if (1..=n_pathways).contains(&k) => return ClusterDecision::Clusters(k),
                _ => {
                    let _ = writeln!(
                        self.output,
                        "enter a number between 1 and {n_pathways}, or q to quit"
                    );
                }
            }
        }
    }
}
