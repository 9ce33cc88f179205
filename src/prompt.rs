//! Interactive answer source: prompts on a writer and reads lines from a reader.
//!
//! Malformed input never aborts the run. The parser's [`InputError`] message is
//! printed and the same question is asked again. End of input is
//! [`PromptError::Closed`].

use std::io::{BufRead, Write};

use crate::assessment::AnswerSource;
use crate::catalog::{Catalog, Question};
use crate::constants::{CONTEXT_QUESTIONS, CRITERION_COUNT};
use crate::error::{InputError, PromptError};
use crate::types::{Answer, ContextAnswers, Criterion, Ranking};

/// Parse a stage-1 rank, rejecting ranks already marked in `used`.
pub fn parse_rank(input: &str, used: &[bool; CRITERION_COUNT]) -> Result<u8, InputError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    if value < 1 || value > CRITERION_COUNT as i64 {
        return Err(InputError::RankOutOfRange(value));
    }
    let rank = value as u8;
    if used[rank as usize - 1] {
        return Err(InputError::DuplicateRank(rank));
    }
    Ok(rank)
}

/// Parse a stage-2 y/n answer.
pub fn parse_yes_no(input: &str) -> Result<bool, InputError> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        other => Err(InputError::NotYesNo(other.to_string())),
    }
}

/// Parse a stage-3 y/n/not sure answer.
pub fn parse_answer(input: &str) -> Result<Answer, InputError> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(Answer::Yes),
        "n" | "no" => Ok(Answer::No),
        "not sure" | "unsure" => Ok(Answer::Unsure),
        other => Err(InputError::NotYesNoUnsure(other.to_string())),
    }
}

/// Line-oriented prompter over any reader/writer pair (stdin/stdout in the binary).
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print the tool banner and the criteria list.
    pub fn print_header(&mut self, catalog: &Catalog) -> Result<(), PromptError> {
        writeln!(self.output, "\nDIGITAL KEY INFRASTRUCTURE (dKI) ASSESSMENT TOOL\n")?;
        writeln!(
            self.output,
            "This tool helps select a dKI scheme based on the following criteria:"
        )?;
        for c in Criterion::ALL {
            writeln!(
                self.output,
                "Criterion {}: {}",
                c.code(),
                catalog.criterion_name(c)
            )?;
        }
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line)
    }

    /// Ask until `parse` accepts the answer.
    fn ask<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<T, PromptError> {
        loop {
            let line = self.read_line(prompt)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> AnswerSource for ConsolePrompter<R, W> {
    type Error = PromptError;

    fn rank_criteria(&mut self, catalog: &Catalog) -> Result<Ranking, PromptError> {
        writeln!(self.output, "\nSTAGE 1: CRITERIA RANKING\n")?;
        writeln!(
            self.output,
            "Rank the importance of each criterion on a scale of 1-5 (5 being highest)."
        )?;
        writeln!(self.output, "Each ranking may only be used once.\n")?;

        let mut used = [false; CRITERION_COUNT];
        let mut ranks = [0u8; CRITERION_COUNT];
        for c in Criterion::ALL {
            let prompt = format!(
                "Ranking for criterion {} ({}): ",
                c.code(),
                catalog.criterion_name(c)
            );
            let rank = self.ask(&prompt, |s| parse_rank(s, &used))?;
            used[rank as usize - 1] = true;
            ranks[c.index()] = rank;
        }
        Ok(Ranking::new(ranks)?)
    }

    fn context_answers(&mut self, _catalog: &Catalog) -> Result<ContextAnswers, PromptError> {
        writeln!(self.output, "\nSTAGE 2: ORGANIZATIONAL CONTEXT\n")?;
        writeln!(
            self.output,
            "Please answer the following questions about your organization:"
        )?;
        let mut answers = ContextAnswers::default();
        for (i, question) in CONTEXT_QUESTIONS.iter().enumerate() {
            answers.0[i] = self.ask(&format!("{} (y/n): ", question), parse_yes_no)?;
        }
        Ok(answers)
    }

    fn answer(&mut self, question: &Question, index: usize) -> Result<Answer, PromptError> {
        if index == 0 {
            writeln!(self.output, "\nSTAGE 3: ADDITIONAL QUESTIONS\n")?;
            writeln!(
                self.output,
                "Please answer the following questions (you may select 'not sure' for up to 2 questions):"
            )?;
        }
        let prompt = format!("Q{}: {} (y/n/not sure): ", question.number, question.text);
        self.ask(&prompt, parse_answer)
    }
}
