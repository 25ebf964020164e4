use crate::controller::UiController;
use crate::errors::{AppError, Result};
use crate::poller::PollerHandle;
use crate::ui::ElementId;

pub const HELP_TEXT: &str = "\
Commands:
  click <element-id>        theme-toggle, folder-btn, download-btn, history-btn,
                            .close, history-modal, history-list, ...
  set url-input <text>      type into the URL box
  set format-select <id>    pick a format (e.g. best, bestaudio)
  set mp3-check on|off      toggle MP3 conversion
  hide | show               page visibility (pauses / resumes progress polling)
  help                      this text
  quit                      exit";

/// One line of terminal input, expressed as a page event.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    Click(ElementId),
    SetUrl(String),
    SetFormat(String),
    SetMp3(bool),
    Hide,
    Show,
    Help,
    Quit,
}

/// What the input loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// Parses a line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<UiCommand>> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (verb, rest) = split_word(line);
    let command = match verb {
        "click" => {
            let (target, extra) = split_word(rest);
            if target.is_empty() || !extra.trim().is_empty() {
                return Err(AppError::InvalidInput("usage: click <element-id>".to_string()));
            }
            UiCommand::Click(target.parse()?)
        }
        "set" => parse_set(rest)?,
        "hide" => UiCommand::Hide,
        "show" => UiCommand::Show,
        "help" | "?" => UiCommand::Help,
        "quit" | "exit" => UiCommand::Quit,
        other => return Err(AppError::InvalidInput(format!("Unknown command: {}", other))),
    };

    Ok(Some(command))
}

fn parse_set(rest: &str) -> Result<UiCommand> {
    let (target, value) = split_word(rest);
    let element: ElementId = target.parse()?;

    match element {
        // Kept verbatim; the download handler trims.
        ElementId::UrlInput => Ok(UiCommand::SetUrl(value.to_string())),
        ElementId::FormatSelect => {
            let format_id = value.trim();
            if format_id.is_empty() {
                return Err(AppError::InvalidInput("usage: set format-select <id>".to_string()));
            }
            Ok(UiCommand::SetFormat(format_id.to_string()))
        }
        ElementId::Mp3Check => match value.trim().to_lowercase().as_str() {
            "on" | "true" | "1" | "checked" => Ok(UiCommand::SetMp3(true)),
            "off" | "false" | "0" | "unchecked" => Ok(UiCommand::SetMp3(false)),
            other => Err(AppError::InvalidInput(format!("mp3-check expects on|off, got '{}'", other))),
        },
        other => Err(AppError::InvalidInput(format!("{} is not an input", other))),
    }
}

/// Splits off the first whitespace-delimited word; the remainder keeps its
/// inner spacing but loses the single separator run.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(index) => {
            let (word, rest) = input.split_at(index);
            (word, rest.trim_start())
        }
        None => (input, ""),
    }
}

pub async fn dispatch(controller: &UiController, poller: &PollerHandle, command: UiCommand) -> Result<Flow> {
    match command {
        UiCommand::Click(target) => controller.handle_click(target).await?,
        UiCommand::SetUrl(url) => {
            let view = controller.view();
            let mut form = view.form();
            form.url = url;
            view.set_form(form);
        }
        UiCommand::SetFormat(format_id) => {
            let view = controller.view();
            let mut form = view.form();
            form.format_id = format_id;
            view.set_form(form);
        }
        UiCommand::SetMp3(mp3) => {
            let view = controller.view();
            let mut form = view.form();
            form.mp3 = mp3;
            view.set_form(form);
        }
        UiCommand::Hide => poller.pause(),
        UiCommand::Show => poller.resume(),
        UiCommand::Help => return Ok(Flow::ShowHelp),
        UiCommand::Quit => {
            poller.stop();
            return Ok(Flow::Quit);
        }
    }

    Ok(Flow::Continue)
}
