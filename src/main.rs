use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod auth;
mod cli;
mod commands;
mod config;
mod errors;
mod log;
mod profile;
mod prompt;
mod provider;
mod render;
mod session;
mod studio;
mod ux;
mod wire;

use crate::auth::{Authenticator, LocalAuthenticator, LoginForm};
use crate::commands::Command;
use crate::profile::PlanType;
use crate::session::{Action, Mode, SessionState};
use crate::studio::Studio;
use crate::wire::{ContentType, PlatformType};

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = cli::Args::parse();
    init_tracing(args.debug);

    let cfg = config::Config::load(&args)?;
    info!(
        provider = ?cfg.provider,
        model = cfg.model(),
        "starting InstaCoach v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = provider::make_client(&cfg)?;
    let authenticator = LocalAuthenticator::new(cfg.profile.clone());

    let form = prompt::ContentForm {
        topic: args.topic.clone().unwrap_or_default(),
        tone: cfg.default_tone.clone(),
        language: cfg.default_language.clone(),
        extra_context: args.context.clone().unwrap_or_default(),
    };
    let recorder = log::Recorder::new(&cfg.artifacts_dir, cfg.save_request, cfg.save_response);
    let mut studio = Studio::new(SessionState::new(form), client).with_recorder(recorder);

    let preset = Preset { platform: args.platform, tool: args.tool, plan: args.plan };
    if args.topic.is_some() {
        let profile = authenticator.login(&authenticator.default_form()).await?;
        studio.dispatch(Action::Login(profile));
        preset.apply(&mut studio);
        one_shot(&mut studio, args.progress).await
    } else {
        interactive(&mut studio, &authenticator, Some(preset), args.progress).await
    }
}

/// Selection requested on the command line, applied once right after login.
struct Preset {
    platform: PlatformType,
    tool: ContentType,
    plan: PlanType,
}

impl Preset {
    fn apply(self, studio: &mut Studio) {
        studio.dispatch(Action::SelectPlatform(self.platform));
        studio.dispatch(Action::SelectTool(self.tool));
        if self.plan.is_premium() {
            studio.dispatch(Action::OpenDashboard);
            studio.dispatch(Action::ChangePlan(self.plan));
            studio.dispatch(Action::OpenStudio);
        }
    }
}

async fn one_shot(studio: &mut Studio, progress: bool) -> Result<()> {
    run_generate(studio, progress).await;
    let state = studio.state();
    if let Some(resp) = state.result() {
        ux::print_view(&render::render(resp));
        return Ok(());
    }
    match state.error() {
        Some(msg) => bail!("{msg}"),
        None => bail!("nothing to generate: set a non-empty --topic"),
    }
}

async fn run_generate(studio: &mut Studio, progress: bool) -> bool {
    let pb = ux::spinner(progress, "Thinking...");
    let sent = studio.generate().await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    sent
}

async fn interactive(
    studio: &mut Studio,
    authenticator: &LocalAuthenticator,
    mut preset: Option<Preset>,
    progress: bool,
) -> Result<()> {
    println!("{}", "Welcome to InstaCoach. Type `help` for commands.".bold());
    show(studio.state());

    loop {
        let prompt = match studio.state().mode() {
            Mode::Unauthenticated => "login>",
            Mode::Studio => "studio>",
            Mode::Dashboard => "dashboard>",
        };
        let Some(line) = ux::read_line(prompt) else {
            break;
        };
        let cmd = match commands::parse(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("{}", msg.yellow());
                continue;
            }
        };

        match cmd {
            Command::Quit => break,
            Command::Help => println!("{}", commands::HELP),
            Command::Show => show(studio.state()),
            Command::Login { name, email } => {
                let defaults = authenticator.default_form();
                let form = LoginForm {
                    name: name.unwrap_or(defaults.name),
                    email: email.unwrap_or(defaults.email),
                };
                match authenticator.login(&form).await {
                    Ok(profile) => {
                        studio.dispatch(Action::Login(profile));
                        if let Some(p) = preset.take() {
                            p.apply(studio);
                        }
                        show(studio.state());
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Command::Generate => {
                if run_generate(studio, progress).await {
                    show(studio.state());
                } else {
                    explain_skipped(studio.state());
                }
            }
            Command::EditProfile { field, value } => {
                let Some(mut profile) = studio.state().profile().cloned() else {
                    println!("{}", "log in first".yellow());
                    continue;
                };
                if studio.state().mode() != Mode::Dashboard {
                    println!("{}", "profile changes live in the dashboard; type `dashboard`".yellow());
                } else if profile.set_field(&field, &value) {
                    studio.dispatch(Action::UpdateProfile(profile));
                    show(studio.state());
                } else {
                    println!("{}", format!("unknown profile field `{field}`").yellow());
                }
            }
            Command::Act(action) => {
                studio.dispatch(action);
                show(studio.state());
            }
        }
    }
    Ok(())
}

fn explain_skipped(state: &SessionState) {
    let why = if !state.is_authenticated() {
        "log in first"
    } else if state.mode() != Mode::Studio {
        "switch to the studio to generate (`studio`)"
    } else if state.is_loading() {
        "a generation is already running"
    } else {
        "set a topic first (`topic <text>`)"
    };
    println!("{}", why.yellow());
}

fn show(state: &SessionState) {
    match state.mode() {
        Mode::Unauthenticated => {
            println!("{}", "Signed out. `login [name] [email]` to start.".dimmed())
        }
        Mode::Dashboard => {
            ux::print_header(state);
            ux::print_dashboard(state);
        }
        Mode::Studio => {
            ux::print_header(state);
            if let Some(resp) = state.result() {
                ux::print_view(&render::render(resp));
            }
            ux::print_studio(state);
        }
    }
}
