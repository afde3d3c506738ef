//! Line-based REPL with rustyline

use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{CompletionType, EditMode, Editor};

use crate::repl::commands::{help_text, CommandHandler, CommandResult};
use crate::session::Session;
use crate::util::config::ReplConfig;

/// Interactive loop around a [`Session`]
pub struct LineREPL {
    config: ReplConfig,
    editor: Editor<(), FileHistory>,
    session: Session,
}

impl LineREPL {
    /// Create a REPL driving `session`
    pub fn new(
        session: Session,
        config: ReplConfig,
    ) -> anyhow::Result<Self> {
        let rl_config = Config::builder()
            .history_ignore_space(true)
            .max_history_size(config.history_size)?
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(rl_config)?;

        if let Some(history_file) = config.history_path() {
            if history_file.exists() {
                let _ = editor.load_history(&history_file);
            }
        }

        Ok(Self {
            config,
            editor,
            session,
        })
    }

    /// Run until `quit` or Ctrl-D
    pub fn run(&mut self) -> anyhow::Result<()> {
        println!("{}\n", help_text());

        loop {
            match self.editor.readline(&self.config.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }

                    let mut handler = CommandHandler::new(&mut self.session, self.config.colors);
                    match handler.handle(&line) {
                        CommandResult::Exit => break,
                        CommandResult::Continue => {}
                        CommandResult::Output(msg) => println!("{}", msg),
                    }
                }
                Err(ReadlineError::Eof) => break,
                Err(ReadlineError::Interrupted) => {
                    println!("(Interrupted)");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(history_file) = self.config.history_path() {
            let _ = self.editor.save_history(&history_file);
        }

        println!("Bye!");
        Ok(())
    }
}
