//! Navigation and form state for one user session.
//!
//! `SessionState` is an immutable value; every user or network event is an
//! [`Action`] and `apply` returns the next state. Nothing here performs I/O.

use crate::profile::{PlanType, UserProfile};
use crate::prompt::ContentForm;
use crate::wire::{AppResponse, ContentType, PlatformType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Unauthenticated,
    Studio,
    Dashboard,
}

/// Identifies one submitted generation, together with the selection that
/// was active when it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub platform: PlatformType,
    pub tool: ContentType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Idle,
    Loading(Ticket),
    Ready(AppResponse),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login(UserProfile),
    Logout,
    OpenDashboard,
    OpenStudio,
    SelectPlatform(PlatformType),
    SelectTool(ContentType),
    SetTopic(String),
    SetTone(String),
    SetLanguage(String),
    SetExtraContext(String),
    Submit,
    ReceiveResult { ticket: u64, response: AppResponse },
    ReceiveError { ticket: u64, message: String },
    ClearResult,
    ChangePlan(PlanType),
    UpdateProfile(UserProfile),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    mode: Mode,
    profile: Option<UserProfile>,
    plan: PlanType,
    platform: PlatformType,
    tool: ContentType,
    form: ContentForm,
    outcome: Outcome,
    next_ticket: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(ContentForm::default())
    }
}

impl SessionState {
    /// A logged-out session whose form starts from `form` (tone and
    /// language defaults usually come from configuration).
    pub fn new(form: ContentForm) -> Self {
        Self {
            mode: Mode::Unauthenticated,
            profile: None,
            plan: PlanType::Free,
            platform: PlatformType::Instagram,
            tool: ContentType::Caption,
            form,
            outcome: Outcome::Idle,
            next_ticket: 1,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_authenticated(&self) -> bool {
        self.mode != Mode::Unauthenticated
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn plan(&self) -> PlanType {
        self.plan
    }

    pub fn is_premium(&self) -> bool {
        self.plan.is_premium()
    }

    pub fn platform(&self) -> PlatformType {
        self.platform
    }

    pub fn tool(&self) -> ContentType {
        self.tool
    }

    pub fn form(&self) -> &ContentForm {
        &self.form
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn result(&self) -> Option<&AppResponse> {
        match &self.outcome {
            Outcome::Ready(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed(m) => Some(m),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        match self.outcome {
            Outcome::Loading(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight().is_some()
    }

    /// Whether a `Submit` would start a generation right now.
    pub fn can_submit(&self) -> bool {
        self.mode == Mode::Studio
            && !self.is_loading()
            && self.tool.is_generative()
            && self.form.has_topic()
    }

    pub fn apply(self, action: Action) -> SessionState {
        if !self.is_authenticated() {
            return match action {
                Action::Login(profile) => self.login(profile),
                Action::Logout => self.logout(),
                _ => self,
            };
        }

        match action {
            Action::Login(profile) => self.login(profile),
            Action::Logout => self.logout(),
            Action::OpenDashboard => SessionState { mode: Mode::Dashboard, ..self },
            Action::OpenStudio => SessionState { mode: Mode::Studio, ..self },
            Action::SelectPlatform(platform) => SessionState {
                platform,
                outcome: Outcome::Idle,
                ..self
            },
            Action::SelectTool(tool) if tool.is_generative() => SessionState {
                tool,
                outcome: Outcome::Idle,
                ..self
            },
            Action::SelectTool(_) => self,
            Action::SetTopic(topic) => self.with_form(|f| f.topic = topic),
            Action::SetTone(tone) => self.with_form(|f| f.tone = tone),
            Action::SetLanguage(language) => self.with_form(|f| f.language = language),
            Action::SetExtraContext(ctx) => self.with_form(|f| f.extra_context = ctx),
            Action::Submit => self.submit(),
            Action::ReceiveResult { ticket, response } => {
                self.settle(ticket, Outcome::Ready(response))
            }
            Action::ReceiveError { ticket, message } => self.settle(ticket, Outcome::Failed(message)),
            Action::ClearResult => match self.outcome {
                Outcome::Ready(_) | Outcome::Failed(_) => SessionState {
                    outcome: Outcome::Idle,
                    ..self
                },
                _ => self,
            },
            Action::ChangePlan(plan) if self.mode == Mode::Dashboard => {
                SessionState { plan, ..self }
            }
            Action::UpdateProfile(profile) if self.mode == Mode::Dashboard => SessionState {
                profile: Some(profile),
                ..self
            },
            Action::ChangePlan(_) | Action::UpdateProfile(_) => self,
        }
    }

    fn login(self, profile: UserProfile) -> SessionState {
        SessionState {
            mode: Mode::Studio,
            profile: Some(profile),
            ..self
        }
    }

    fn logout(self) -> SessionState {
        SessionState {
            mode: Mode::Unauthenticated,
            profile: None,
            plan: PlanType::Free,
            form: ContentForm {
                topic: String::new(),
                ..self.form
            },
            outcome: Outcome::Idle,
            ..self
        }
    }

    fn with_form(mut self, edit: impl FnOnce(&mut ContentForm)) -> SessionState {
        edit(&mut self.form);
        self
    }

    fn submit(self) -> SessionState {
        if !self.can_submit() {
            return self;
        }
        let ticket = Ticket {
            id: self.next_ticket,
            platform: self.platform,
            tool: self.tool,
        };
        SessionState {
            outcome: Outcome::Loading(ticket),
            next_ticket: self.next_ticket + 1,
            ..self
        }
    }

    /// Apply a completion only if it answers the generation currently in
    /// flight for the current selection; anything else is stale.
    fn settle(self, ticket: u64, outcome: Outcome) -> SessionState {
        match self.in_flight() {
            Some(t) if t.id == ticket && t.platform == self.platform && t.tool == self.tool => {
                SessionState { outcome, ..self }
            }
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::avatar_url_for;
    use crate::wire::{HashtagIntent, HashtagResponse, ResponseBase};
    use pretty_assertions::assert_eq;

    fn alex() -> UserProfile {
        UserProfile {
            name: "Alex Creator".into(),
            email: "alex@instacoach.ai".into(),
            country: "India".into(),
            gender: "Male".into(),
            avatar_url: avatar_url_for("Alex"),
        }
    }

    fn hashtags() -> AppResponse {
        AppResponse::Hashtags(HashtagResponse {
            base: ResponseBase::default(),
            core_tags: vec!["#eco".into()],
            longtail_tags: vec!["#sustainablelivingtips".into()],
            intent: HashtagIntent::Reach,
        })
    }

    fn studio() -> SessionState {
        SessionState::default().apply(Action::Login(alex()))
    }

    fn loading(topic: &str) -> (SessionState, Ticket) {
        let s = studio()
            .apply(Action::SetTopic(topic.into()))
            .apply(Action::Submit);
        let t = s.in_flight().expect("submit should start loading");
        (s, t)
    }

    #[test]
    fn test_defaults() {
        let s = SessionState::default();
        assert_eq!(s.mode(), Mode::Unauthenticated);
        assert_eq!(s.platform(), PlatformType::Instagram);
        assert_eq!(s.tool(), ContentType::Caption);
        assert_eq!(s.form().tone, "friendly");
        assert_eq!(s.form().language, "English");
        assert_eq!(s.plan(), PlanType::Free);
    }

    #[test]
    fn test_actions_ignored_until_login() {
        let s = SessionState::default()
            .apply(Action::SelectPlatform(PlatformType::Youtube))
            .apply(Action::SetTopic("ignored".into()))
            .apply(Action::OpenDashboard);
        assert_eq!(s, SessionState::default());

        let s = s.apply(Action::Login(alex()));
        assert_eq!(s.mode(), Mode::Studio);
        assert_eq!(s.profile(), Some(&alex()));
    }

    #[test]
    fn test_submit_with_empty_topic_is_noop() {
        let s = studio();
        assert_eq!(s.clone().apply(Action::Submit), s);
        let s = s.apply(Action::SetTopic("   ".into()));
        assert_eq!(s.clone().apply(Action::Submit), s);
    }

    #[test]
    fn test_submit_then_result() {
        let (s, t) = loading("sustainable living");
        assert_eq!(t.platform, PlatformType::Instagram);
        assert_eq!(t.tool, ContentType::Caption);
        assert!(!s.can_submit());

        let s = s.apply(Action::ReceiveResult { ticket: t.id, response: hashtags() });
        assert_eq!(s.result(), Some(&hashtags()));
        assert!(s.error().is_none());
        assert!(!s.is_loading());
    }

    #[test]
    fn test_error_replaces_loading_and_clears_result() {
        let (s, t) = loading("yoga");
        let s = s.apply(Action::ReceiveError { ticket: t.id, message: "boom".into() });
        assert_eq!(s.error(), Some("boom"));
        assert!(s.result().is_none());

        // a fresh submit from the error state drops the error
        let s = s.apply(Action::Submit);
        assert!(s.is_loading());
        assert!(s.error().is_none());
    }

    #[test]
    fn test_second_submit_while_loading_is_inert() {
        let (s, t) = loading("yoga");
        let again = s.clone().apply(Action::Submit);
        assert_eq!(again, s);
        assert_eq!(again.in_flight(), Some(t));
    }

    #[test]
    fn test_tickets_are_unique() {
        let (s, first) = loading("yoga");
        let s = s
            .apply(Action::ReceiveResult { ticket: first.id, response: hashtags() })
            .apply(Action::Submit);
        assert_ne!(s.in_flight().unwrap().id, first.id);
    }

    #[test]
    fn test_selection_change_clears_result_even_when_same() {
        let (s, t) = loading("yoga");
        let s = s.apply(Action::ReceiveResult { ticket: t.id, response: hashtags() });

        let same_platform = s.clone().apply(Action::SelectPlatform(PlatformType::Instagram));
        assert_eq!(same_platform.outcome(), &Outcome::Idle);

        let same_tool = s.clone().apply(Action::SelectTool(ContentType::Caption));
        assert_eq!(same_tool.outcome(), &Outcome::Idle);

        let errored = studio()
            .apply(Action::SetTopic("x".into()))
            .apply(Action::Submit);
        let id = errored.in_flight().unwrap().id;
        let errored = errored.apply(Action::ReceiveError { ticket: id, message: "e".into() });
        let cleared = errored.apply(Action::SelectTool(ContentType::Bio));
        assert!(cleared.error().is_none());
        assert_eq!(cleared.tool(), ContentType::Bio);
    }

    #[test]
    fn test_stale_result_after_navigation_is_discarded() {
        let (s, t) = loading("yoga");
        let s = s.apply(Action::SelectPlatform(PlatformType::Twitter));
        assert_eq!(s.outcome(), &Outcome::Idle);

        let after = s.clone().apply(Action::ReceiveResult { ticket: t.id, response: hashtags() });
        assert_eq!(after, s);
        let after = s.clone().apply(Action::ReceiveError { ticket: t.id, message: "late".into() });
        assert_eq!(after, s);
    }

    #[test]
    fn test_stale_result_from_older_ticket_is_discarded() {
        let (s, old) = loading("yoga");
        let s = s
            .apply(Action::SelectTool(ContentType::Bio))
            .apply(Action::Submit);
        let current = s.in_flight().unwrap();

        let s = s.apply(Action::ReceiveResult { ticket: old.id, response: hashtags() });
        assert_eq!(s.in_flight(), Some(current));
    }

    #[test]
    fn test_ui_only_tool_selection_is_ignored() {
        let s = studio();
        assert_eq!(s.clone().apply(Action::SelectTool(ContentType::Export)), s);
    }

    #[test]
    fn test_logout_resets_regardless_of_state() {
        let (s, t) = loading("yoga");
        let with_result = s
            .clone()
            .apply(Action::ReceiveResult { ticket: t.id, response: hashtags() })
            .apply(Action::OpenDashboard)
            .apply(Action::ChangePlan(PlanType::Yearly));

        for before in [s, with_result, studio(), SessionState::default()] {
            let after = before.apply(Action::Logout);
            assert!(!after.is_authenticated());
            assert!(after.result().is_none());
            assert_eq!(after.form().topic, "");
            assert!(after.profile().is_none());
            assert_eq!(after.plan(), PlanType::Free);
        }
    }

    #[test]
    fn test_logout_before_login_still_clears_topic() {
        let form = ContentForm {
            topic: "sustainable living".into(),
            ..ContentForm::default()
        };
        let s = SessionState::new(form).apply(Action::Logout);
        assert!(!s.is_authenticated());
        assert_eq!(s.form().topic, "");
        assert!(s.result().is_none());
        assert_eq!(s.form().tone, "friendly");
    }

    #[test]
    fn test_logout_keeps_tone_and_language() {
        let s = studio()
            .apply(Action::SetTone("luxury".into()))
            .apply(Action::SetLanguage("Hindi".into()))
            .apply(Action::Logout);
        assert_eq!(s.form().tone, "luxury");
        assert_eq!(s.form().language, "Hindi");
    }

    #[test]
    fn test_dashboard_changes_do_not_navigate() {
        let s = studio().apply(Action::OpenDashboard);
        let mut updated = alex();
        updated.country = "Spain".into();

        let s = s
            .apply(Action::ChangePlan(PlanType::Monthly))
            .apply(Action::UpdateProfile(updated.clone()));
        assert_eq!(s.mode(), Mode::Dashboard);
        assert!(s.is_premium());
        assert_eq!(s.profile(), Some(&updated));

        let s = s.apply(Action::OpenStudio);
        assert_eq!(s.mode(), Mode::Studio);
    }

    #[test]
    fn test_plan_change_outside_dashboard_is_ignored() {
        let s = studio();
        assert_eq!(s.clone().apply(Action::ChangePlan(PlanType::Yearly)), s);
    }

    #[test]
    fn test_submit_only_in_studio() {
        let s = studio()
            .apply(Action::SetTopic("yoga".into()))
            .apply(Action::OpenDashboard);
        assert_eq!(s.clone().apply(Action::Submit), s);
    }

    #[test]
    fn test_clear_result_dismisses_but_keeps_loading() {
        let (s, t) = loading("yoga");
        assert_eq!(s.clone().apply(Action::ClearResult), s);

        let s = s
            .apply(Action::ReceiveResult { ticket: t.id, response: hashtags() })
            .apply(Action::ClearResult);
        assert_eq!(s.outcome(), &Outcome::Idle);
    }
}
