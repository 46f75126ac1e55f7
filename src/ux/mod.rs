use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::profile::PlanType;
use crate::prompt::{topic_hint, LANGUAGES, TONES};
use crate::render::{Item, RenderedView};
use crate::session::{Mode, Outcome, SessionState};
use crate::wire::{ContentType, PlatformType};

pub fn print_header(state: &SessionState) {
    let Some(profile) = state.profile() else {
        println!("{}", "InstaCoach".bold());
        return;
    };
    let upgrade = if !state.is_premium() && state.mode() != Mode::Dashboard {
        format!("   {}", "Upgrade to Pro → `dashboard`".magenta().bold())
    } else {
        String::new()
    };
    println!(
        "\n{}   {} · {}{}",
        "InstaCoach".bold(),
        profile.name.bold(),
        state.plan().badge().dimmed(),
        upgrade
    );
}

pub fn print_studio(state: &SessionState) {
    println!("\n{}", "1  Select Platform".bold());
    let platforms: Vec<String> = PlatformType::ALL
        .iter()
        .map(|p| mark(*p == state.platform(), p.display_name()))
        .collect();
    println!("   {}", platforms.join("  "));

    println!("{}", "2  Choose Tool".bold());
    for tool in ContentType::TOOLS {
        println!(
            "   {}  {}",
            mark(tool == state.tool(), tool.label()),
            tool.description().dimmed()
        );
    }

    let form = state.form();
    println!("{}", "3  Customize & Generate".bold());
    if form.has_topic() {
        println!("   topic:    {}", form.topic);
    } else {
        println!("   topic:    {}", topic_hint(state.tool(), state.platform()).dimmed());
    }
    println!("   tone:     {}  {}", form.tone, format!("({})", TONES.join(", ")).dimmed());
    println!("   language: {}  {}", form.language, format!("({})", LANGUAGES.join(", ")).dimmed());
    if !form.extra_context.is_empty() {
        println!("   context:  {}", form.extra_context);
    }
    print_outcome(state);
}

fn mark(selected: bool, label: &str) -> String {
    if selected {
        format!("[{}]", label).green().bold().to_string()
    } else {
        format!(" {} ", label)
    }
}

fn print_outcome(state: &SessionState) {
    match state.outcome() {
        Outcome::Idle if state.form().has_topic() => {
            println!("\n{}", "Ready: type `generate`.".dimmed())
        }
        Outcome::Idle => {
            println!("\n{}", "Ready to create magic? Set a topic to get started.".dimmed())
        }
        Outcome::Loading(_) => println!("\n{}", "Thinking...".yellow()),
        Outcome::Failed(msg) => println!("\n{} {}", "●".red(), msg.red()),
        Outcome::Ready(_) => println!("\n{}", "A result is shown above; `clear` dismisses it.".dimmed()),
    }
}

pub fn print_dashboard(state: &SessionState) {
    println!("\n{}", "Dashboard".bold());
    if let Some(p) = state.profile() {
        println!("   name:    {}", p.name);
        println!("   email:   {}", p.email);
        println!("   country: {}", p.country);
        println!("   gender:  {}", p.gender);
        println!("   avatar:  {}", p.avatar_url.dimmed());
    }
    println!("{}", "Plans".bold());
    for plan in PlanType::ALL {
        let label = format!("{:<10} {}", plan.as_str(), plan.billing());
        println!("   {}", mark(plan == state.plan(), &label));
    }
    println!("{}", "`studio` returns to the studio.".dimmed());
}

pub fn print_view(view: &RenderedView) {
    let mut title = view.title.bold().to_string();
    if let Some(sub) = &view.subtitle {
        title.push_str(&format!("  {}", sub.dimmed()));
    }
    if let Some(p) = view.platform {
        title.push_str(&format!("  {}", p.display_name().cyan()));
    }
    if let Some(lang) = &view.language {
        title.push_str(&format!("  {}", lang.dimmed()));
    }
    println!("\n{}", "┏━━━━━━━━━━━━━━━━━━━━━━━━ Results ━━━━━━━━━━━━━━━━━━━━━━━━┓".bold());
    println!("  {}", title);
    if let Some(gate) = &view.gate {
        println!("  {} {}", "[LOCKED]".magenta().bold(), gate);
    }
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());

    for section in &view.sections {
        println!("\n{}", section.heading.bold().underline());
        if section.items.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for item in &section.items {
            match item {
                Item::Text { label: Some(label), body } => {
                    println!("  {}", label.cyan());
                    println!("{}", indent(body, 4));
                }
                Item::Text { label: None, body } => println!("{}", indent(body, 2)),
                Item::Tags(tags) => println!("  {}", tags.join(" ").blue()),
                Item::Locked { label, unlock_instructions } => {
                    println!("  {} {}", "🔒".magenta(), label.dimmed());
                    println!("    {}", unlock_instructions.magenta());
                }
            }
        }
    }
    println!();
}

pub fn spinner(enabled: bool, message: &str) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Prompt and read one line; `None` on EOF.
pub fn read_line(prompt: &str) -> Option<String> {
    print!("{} ", prompt.bold());
    let _ = io::stdout().flush();
    let mut s = String::new();
    match io::stdin().lock().read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(s),
    }
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}
