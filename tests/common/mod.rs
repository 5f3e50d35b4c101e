//! Shared test helpers: a scripted prompter and throwaway Git repositories

#![allow(dead_code, reason = "Not every test binary uses every helper")]

use commity::config::{BooleanEntry, ChoiceEntry, TextEntry};
use commity::error::CommityError;
use commity::form::{Overview, Prompter, TextRules};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Answer {
    Text(String),
    Choice(String),
    Confirm(bool),
    Abort,
}

/// Prompter replaying a fixed list of answers
///
/// Records what it was asked so tests can check the sequence.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub overview_shown: bool,
    pub asked: Vec<String>,
    pub initials: Vec<String>,
    pub rejections: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            ..Self::default()
        }
    }

    fn next(&mut self, name: &str, initial: String) -> Result<Answer, CommityError> {
        self.asked.push(name.to_owned());
        self.initials.push(initial);
        match self.answers.pop_front() {
            Some(Answer::Abort) | None => Err(CommityError::UserAborted),
            Some(answer) => Ok(answer),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn overview(&mut self, _overview: &Overview) -> Result<(), CommityError> {
        self.overview_shown = true;
        match self.answers.front() {
            Some(Answer::Abort) => Err(CommityError::UserAborted),
            _ => Ok(()),
        }
    }

    fn text(
        &mut self,
        entry: &TextEntry,
        initial: &str,
        _rules: &TextRules<'_>,
    ) -> Result<String, CommityError> {
        match self.next(&entry.name, initial.to_owned())? {
            Answer::Text(text) => Ok(text),
            other => panic!("expected a text answer for {}, got {other:?}", entry.name),
        }
    }

    fn choice(&mut self, entry: &ChoiceEntry, initial: usize) -> Result<String, CommityError> {
        match self.next(&entry.name, initial.to_string())? {
            Answer::Choice(value) => Ok(value),
            other => panic!("expected a choice answer for {}, got {other:?}", entry.name),
        }
    }

    fn confirm(&mut self, entry: &BooleanEntry, initial: bool) -> Result<bool, CommityError> {
        match self.next(&entry.name, initial.to_string())? {
            Answer::Confirm(value) => Ok(value),
            other => panic!("expected a confirm answer for {}, got {other:?}", entry.name),
        }
    }

    fn invalid(&mut self, error: &CommityError) {
        self.rejections.push(error.to_string());
    }
}

/// Initialize a repository with a configured author
pub fn init_repository(dir: &Path) -> git2::Repository {
    let repo = git2::Repository::init(dir).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }
    repo
}

/// Write a file and add it to the index
pub fn stage_file(repo: &git2::Repository, name: &str, contents: &str) {
    let workdir = repo.workdir().unwrap();
    fs::write(workdir.join(name), contents).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
}

/// Temporary repository with one staged file
pub fn staged_repository() -> (TempDir, git2::Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = init_repository(temp_dir.path());
    stage_file(&repo, "README.md", "# Test\n");
    (temp_dir, repo)
}
