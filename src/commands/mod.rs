use clap::ValueEnum;

use crate::profile::PlanType;
use crate::session::Action;
use crate::wire::{ContentType, PlatformType};

/// One line typed into the studio.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { name: Option<String>, email: Option<String> },
    Act(Action),
    Generate,
    EditProfile { field: String, value: String },
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Studio
  platform <instagram|youtube|facebook|twitter|whatsapp>
  tool <caption|bio|hashtags|reel_script|30_day_plan>
  topic <text>        tone <text>        language <text>
  context <text>      generate           clear
  show                dashboard          logout
Dashboard
  plan <free|monthly|quarterly|yearly>
  profile <name|email|country|gender|avatar> <value>
  studio | back
Session
  login [name...] [email]    help    quit";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };

    let cmd = match head.to_lowercase().as_str() {
        "" => return Err("type `help` to list commands".into()),
        "login" => parse_login(rest),
        "logout" => Command::Act(Action::Logout),
        "platform" => Command::Act(Action::SelectPlatform(enum_arg::<PlatformType>("platform", rest)?)),
        "tool" => Command::Act(Action::SelectTool(enum_arg::<ContentType>("tool", rest)?)),
        "topic" => Command::Act(Action::SetTopic(rest.to_string())),
        "tone" => Command::Act(Action::SetTone(required("tone", rest)?)),
        "language" | "lang" => Command::Act(Action::SetLanguage(required("language", rest)?)),
        "context" => Command::Act(Action::SetExtraContext(rest.to_string())),
        "generate" | "gen" => Command::Generate,
        "clear" => Command::Act(Action::ClearResult),
        "dashboard" => Command::Act(Action::OpenDashboard),
        "studio" | "back" => Command::Act(Action::OpenStudio),
        "plan" => Command::Act(Action::ChangePlan(enum_arg::<PlanType>("plan", rest)?)),
        "profile" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: profile <field> <value>".to_string())?;
            Command::EditProfile {
                field: field.to_lowercase(),
                value: value.trim().to_string(),
            }
        }
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(cmd)
}

fn parse_login(rest: &str) -> Command {
    let mut words: Vec<&str> = rest.split_whitespace().collect();
    let email = match words.last() {
        Some(w) if w.contains('@') => words.pop().map(str::to_string),
        _ => None,
    };
    let name = (!words.is_empty()).then(|| words.join(" "));
    Command::Login { name, email }
}

fn required(what: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {what} <value>"))
    } else {
        Ok(rest.to_string())
    }
}

fn enum_arg<T: ValueEnum>(what: &str, rest: &str) -> Result<T, String> {
    T::from_str(rest, true).map_err(|_| {
        let options: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|p| p.get_name().to_string())
            .collect();
        format!("unknown {what} `{rest}`; expected one of: {}", options.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selection_commands() {
        assert_eq!(
            parse("platform x").unwrap(),
            Command::Act(Action::SelectPlatform(PlatformType::Twitter))
        );
        assert_eq!(
            parse("TOOL 30_day_plan").unwrap(),
            Command::Act(Action::SelectTool(ContentType::ContentPlan))
        );
        assert_eq!(
            parse("plan yearly").unwrap(),
            Command::Act(Action::ChangePlan(PlanType::Yearly))
        );
    }

    #[test]
    fn test_free_text_keeps_inner_spacing() {
        assert_eq!(
            parse("topic   sustainable  living ").unwrap(),
            Command::Act(Action::SetTopic("sustainable  living".into()))
        );
        assert_eq!(parse("topic").unwrap(), Command::Act(Action::SetTopic(String::new())));
    }

    #[test]
    fn test_login_variants() {
        assert_eq!(
            parse("login Priya Shah priya@shah.in").unwrap(),
            Command::Login { name: Some("Priya Shah".into()), email: Some("priya@shah.in".into()) }
        );
        assert_eq!(parse("login").unwrap(), Command::Login { name: None, email: None });
    }

    #[test]
    fn test_profile_edit() {
        assert_eq!(
            parse("profile Country Spain").unwrap(),
            Command::EditProfile { field: "country".into(), value: "Spain".into() }
        );
        assert!(parse("profile country").is_err());
    }

    #[test]
    fn test_bad_input_is_reported() {
        let err = parse("platform myspace").unwrap_err();
        assert!(err.contains("instagram"), "{err}");
        assert!(parse("tool export").is_err());
        assert!(parse("tone").is_err());
        assert!(parse("dance").is_err());
        assert!(parse("").is_err());
    }
}
