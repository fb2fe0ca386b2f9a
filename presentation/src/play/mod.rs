//! Terminal game
//!
//! Plays a full show in the terminal: the host and the bachelorette speak,
//! the player types an answer each round (an empty line lets the show answer
//! for them) and the AI contestants answer alongside.

use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use spotlight_application::{GameHost, SessionError, TextGenerationGateway};
use spotlight_domain::Stage;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const HISTORY_SIZE: usize = 200;

#[derive(Error, Debug)]
pub enum PlayError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Terminal input failed: {0}")]
    Input(#[from] std::io::Error),
}

/// What the player typed at a prompt
enum Input {
    Line(String),
    Quit,
}

/// Interactive terminal show
pub struct TerminalGame<G: TextGenerationGateway + ?Sized + 'static> {
    host: Arc<GameHost<G>>,
    progress: ProgressReporter,
}

impl<G: TextGenerationGateway + ?Sized + 'static> TerminalGame<G> {
    pub fn new(host: Arc<GameHost<G>>) -> Self {
        Self {
            host,
            progress: ProgressReporter::default(),
        }
    }

    /// Set whether to show spinners while generating
    pub fn with_progress(mut self, show: bool) -> Self {
        self.progress = ProgressReporter::new(show);
        self
    }

    /// Play shows until the player declines another one
    pub async fn run(&self) -> Result<(), PlayError> {
        let mut editor = Self::editor();

        loop {
            if !self.play_one(&mut editor).await? {
                println!("Bye!");
                break;
            }

            match Self::read_input(&mut editor, "Another show? [y/N]")? {
                Input::Line(answer) if answer.eq_ignore_ascii_case("y") => {
                    self.host.reset().await;
                }
                _ => break,
            }
        }

        Ok(())
    }

    /// Play one show; `false` if the player quit halfway
    async fn play_one(&self, editor: &mut Reedline) -> Result<bool, PlayError> {
        let host = &self.host;
        let human = host.settings().roster.human().id.clone();
        let max_rounds = host.settings().max_rounds;

        println!("{}", ConsoleFormatter::header("Spotlight: AI Dating Show"));
        println!(
            "You are {}. Press Enter on an empty line to let the show answer for you, /quit to leave.\n",
            human.to_string().bold()
        );

        let mut session = host.session().await;

        let intro = self
            .progress
            .track("The host takes the stage...", session.host_introduction())
            .await?;
        println!("{}", ConsoleFormatter::speech("Host", &intro));

        let intro = self
            .progress
            .track("The bachelorette steps out...", session.ai_introduction())
            .await?;
        println!("{}", ConsoleFormatter::speech("Bachelorette", &intro));

        while session.stage() == Stage::QuestionSubmission {
            let output = self
                .progress
                .track("Preparing questions...", session.generate_question())
                .await?;
            debug!("Question {} ready", output.questions_generated);
        }

        while session.stage() == Stage::RoundStart {
            let next = session.next_question()?;
            println!(
                "{}",
                ConsoleFormatter::question(next.round, max_rounds, &next.question)
            );

            let answer = match Self::read_input(editor, "Your answer")? {
                Input::Line(line) => line,
                Input::Quit => return Ok(false),
            };
            let submitted = self
                .progress
                .track(
                    "Recording your answer...",
                    session.submit_answer(&human, Some(answer.as_str())),
                )
                .await?;
            if submitted.was_auto_generated {
                println!("{}", ConsoleFormatter::speech(human.as_str(), &submitted.answer_text));
            }

            let answers = self
                .progress
                .track("The other contestants answer...", session.collect_ai_answers())
                .await?;
            for (participant, answer) in &answers {
                println!("{}", ConsoleFormatter::speech(participant.as_str(), answer));
            }

            let ratings = self
                .progress
                .track("The bachelorette is deciding...", session.rate_all_answers())
                .await?;
            println!("{}", ConsoleFormatter::ratings(&ratings));

            session.advance_round()?;
        }

        let result = self
            .progress
            .track("And the winner is...", session.announce_winner())
            .await?;
        println!("{}", ConsoleFormatter::speech("Host", &result.text));
        println!(
            "{}",
            ConsoleFormatter::standings(&result.final_ratings, &result.winner)
        );
        if result.winner == human {
            println!("{}", "You won the date!".green().bold());
        }
        println!("{}", ConsoleFormatter::footer());

        Ok(true)
    }

    fn editor() -> Reedline {
        let editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("spotlight").join("history.txt"));
        let Some(path) = history_path else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_SIZE, path) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                debug!("Answer history disabled: {}", e);
                editor
            }
        }
    }

    fn read_input(editor: &mut Reedline, label: &str) -> Result<Input, PlayError> {
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(label.to_string()),
            DefaultPromptSegment::Empty,
        );

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line == "/quit" {
                        return Ok(Input::Quit);
                    }
                    return Ok(Input::Line(line.to_string()));
                }
                Signal::CtrlC => {
                    println!("^C (type /quit to leave)");
                }
                Signal::CtrlD => return Ok(Input::Quit),
            }
        }
    }
}

/// Print an error the way the terminal game shows it
pub fn print_error(err: &PlayError) {
    eprintln!("{}", ConsoleFormatter::error(&err.to_string()));
}
