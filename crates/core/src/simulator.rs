//! Preview replies shaped by the bot's behaviour settings.
//!
//! This is keyword matching, not language understanding. The only random step (the uncertainty
//! clause) goes through [`UncertaintySource`] so callers can seed or force it.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::domain::behavior::{EmojiPolicy, FormatPreference, ResponseLength, WhenUnsure};
use crate::domain::bot::BotConfiguration;

pub const UNCERTAINTY_PROBABILITY: f64 = 0.3;

pub const BOOKING_HANDOFF: &str =
    "I'd be happy to help you book an appointment. I'm opening our booking page for you now.";
pub const ORDER_HANDOFF: &str =
    "I can help you track your order. Please share your order number and the email you used at \
     checkout.";

const INSTALL_KEYWORDS: &[&str] =
    &["install", "widget", "embed", "snippet", "script tag", "set up", "setup"];

const INSTALL_CONCISE: &[&str] =
    &["Copy the embed script and paste it before the closing </body> tag."];
const INSTALL_NORMAL: &[&str] = &[
    "Copy the embed script from the Install tab.",
    "Paste it just before the closing </body> tag on every page.",
    "Publish your bot and the widget appears within a minute.",
];
const INSTALL_DETAILED: &[&str] = &[
    "Open the Install tab and copy the embed script for this bot.",
    "Paste it just before the closing </body> tag on every page where the chat should appear.",
    "If you use a site builder, add it through the custom code or footer scripts setting.",
    "Publish your bot, then reload your site to see the launcher in the configured corner.",
];

const GENERAL_CONCISE: &str = "Got it! How else can I help?";
const GENERAL_NORMAL: &str = "Thanks for your message. I can answer questions about our \
                              products, help you book an appointment, or check on an order.";
const GENERAL_DETAILED: &str = "Thanks for reaching out. I can answer questions about our \
                                products and services, help you book an appointment, or check \
                                the status of an order. Tell me a little more about what you \
                                need and I will point you in the right direction.";

const CLARIFY_QUESTION: &str =
    "Could you tell me which website platform you are using so I can give you the exact steps?";
const ADMIT_WITH_NEXT_STEPS: &str = "I'm not completely sure about that. Here is what you can \
                                     try next:\n1. Check the installation guide in your \
                                     dashboard.\n2. Make sure the bot is published and the \
                                     script is on the page.\n3. Contact our support team if the \
                                     widget still does not appear.";
const DEFAULT_ESCALATION: &str = "Let me connect you with a member of our team.";

pub trait UncertaintySource {
    /// Returns `true` with the given probability.
    fn roll(&mut self, probability: f64) -> bool;
}

#[derive(Clone, Debug)]
pub struct RngUncertainty<R>(R);

impl RngUncertainty<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RngUncertainty<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> UncertaintySource for RngUncertainty<R> {
    fn roll(&mut self, probability: f64) -> bool {
        probability.is_finite() && self.0.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Always or never uncertain.
#[derive(Clone, Copy, Debug)]
pub struct FixedUncertainty(pub bool);

impl UncertaintySource for FixedUncertainty {
    fn roll(&mut self, _probability: f64) -> bool {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyBranch {
    Booking,
    Order,
    Install,
    General,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulatedReply {
    pub text: String,
    pub branch: ReplyBranch,
    pub uncertain: bool,
}

#[derive(Clone, Debug)]
pub struct ResponsePolicyEngine<U> {
    uncertainty: U,
    probability: f64,
}

impl<U: UncertaintySource> ResponsePolicyEngine<U> {
    pub fn new(uncertainty: U) -> Self {
        Self { uncertainty, probability: UNCERTAINTY_PROBABILITY }
    }

    /// Overrides the injection probability; values outside `[0, 1]` are clamped.
    pub fn with_probability(mut self, probability: f64) -> Self {
        if probability.is_finite() {
            self.probability = probability.clamp(0.0, 1.0);
        }
        self
    }

    pub fn respond(&mut self, utterance: &str, config: &BotConfiguration) -> String {
        self.simulate(utterance, config).text
    }

    pub fn simulate(&mut self, utterance: &str, config: &BotConfiguration) -> SimulatedReply {
        let behavior = &config.behavior;
        let normalized = utterance.to_lowercase();

        if matches_any(&normalized, behavior.booking_intents.iter().map(String::as_str)) {
            return handoff_reply(BOOKING_HANDOFF, "📅", ReplyBranch::Booking, behavior.emoji);
        }
        if matches_any(&normalized, behavior.order_intents.iter().map(String::as_str)) {
            return handoff_reply(ORDER_HANDOFF, "📦", ReplyBranch::Order, behavior.emoji);
        }

        if !matches_any(&normalized, INSTALL_KEYWORDS.iter().copied()) {
            let general = general_reply(behavior.response_length).to_string();
            let text = shape_emoji(general, behavior.emoji);
            let reply = SimulatedReply { text, branch: ReplyBranch::General, uncertain: false };
            return self.finish(config, reply);
        }

        let base = install_reply(behavior.response_length, behavior.format_preference);
        let mut text = shape_emoji(base, behavior.emoji);
        let uncertain = self.uncertainty.roll(self.probability);
        if uncertain {
            text.push_str("\n\n");
            text.push_str(&uncertainty_clause(behavior.when_unsure, &behavior.escalation_message));
        }

        self.finish(config, SimulatedReply { text, branch: ReplyBranch::Install, uncertain })
    }

    fn finish(&self, config: &BotConfiguration, reply: SimulatedReply) -> SimulatedReply {
        debug!(
            event_name = "simulator.reply",
            bot_id = %config.id,
            branch = ?reply.branch,
            uncertain = reply.uncertain,
            "simulated reply produced"
        );
        reply
    }
}

impl ResponsePolicyEngine<RngUncertainty<StdRng>> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(RngUncertainty::seeded(seed))
    }
}

fn matches_any<'a>(normalized: &str, keywords: impl IntoIterator<Item = &'a str>) -> bool {
    keywords.into_iter().any(|keyword| {
        let keyword = keyword.trim();
        !keyword.is_empty() && normalized.contains(&keyword.to_lowercase())
    })
}

fn handoff_reply(
    sentence: &str,
    emoji: &str,
    branch: ReplyBranch,
    policy: EmojiPolicy,
) -> SimulatedReply {
    let text = match policy {
        EmojiPolicy::Allowed => format!("{sentence} {emoji}"),
        EmojiPolicy::Never | EmojiPolicy::Sparingly => sentence.to_string(),
    };
    SimulatedReply { text, branch, uncertain: false }
}

fn install_reply(length: ResponseLength, format: FormatPreference) -> String {
    let sentences = match length {
        ResponseLength::Concise => return INSTALL_CONCISE.join(" "),
        ResponseLength::Normal => INSTALL_NORMAL,
        ResponseLength::Detailed => INSTALL_DETAILED,
    };

    match format {
        FormatPreference::Paragraphs => sentences.join(" "),
        FormatPreference::Bullets => sentences
            .iter()
            .map(|sentence| format!("• {sentence}"))
            .collect::<Vec<_>>()
            .join("\n"),
        FormatPreference::Steps => sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| format!("{}. {sentence}", index + 1))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn general_reply(length: ResponseLength) -> &'static str {
    match length {
        ResponseLength::Concise => GENERAL_CONCISE,
        ResponseLength::Normal => GENERAL_NORMAL,
        ResponseLength::Detailed => GENERAL_DETAILED,
    }
}

fn shape_emoji(text: String, policy: EmojiPolicy) -> String {
    match policy {
        EmojiPolicy::Never => text,
        EmojiPolicy::Sparingly => format!("{text} 🙂"),
        EmojiPolicy::Allowed => format!("👋 {text} 🚀"),
    }
}

fn uncertainty_clause(when_unsure: WhenUnsure, escalation_message: &str) -> String {
    match when_unsure {
        WhenUnsure::Clarify => CLARIFY_QUESTION.to_string(),
        WhenUnsure::Admit => ADMIT_WITH_NEXT_STEPS.to_string(),
        WhenUnsure::Escalate => {
            let message = escalation_message.trim();
            if message.is_empty() { DEFAULT_ESCALATION } else { message }.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FixedUncertainty, ReplyBranch, ResponsePolicyEngine, BOOKING_HANDOFF, CLARIFY_QUESTION,
        INSTALL_CONCISE, ORDER_HANDOFF,
    };
    use crate::domain::behavior::{EmojiPolicy, FormatPreference, ResponseLength, WhenUnsure};
    use crate::domain::bot::BotConfiguration;

    const INSTALL_QUESTION: &str = "How do I install the widget on my site?";

    fn config(
        length: ResponseLength,
        format: FormatPreference,
        emoji: EmojiPolicy,
    ) -> BotConfiguration {
        let mut config = BotConfiguration::new("Simulator");
        config.behavior.response_length = length;
        config.behavior.format_preference = format;
        config.behavior.emoji = emoji;
        config
    }

    fn always() -> ResponsePolicyEngine<FixedUncertainty> {
        ResponsePolicyEngine::new(FixedUncertainty(true))
    }

    fn never() -> ResponsePolicyEngine<FixedUncertainty> {
        ResponsePolicyEngine::new(FixedUncertainty(false))
    }

    #[test]
    fn booking_intent_short_circuits_regardless_of_settings() {
        for length in ResponseLength::ALL {
            for unsure in WhenUnsure::ALL {
                let mut config = config(*length, FormatPreference::Steps, EmojiPolicy::Never);
                config.behavior.when_unsure = *unsure;

                let reply = always().simulate("I want to book an appointment", &config);
                assert_eq!(reply.branch, ReplyBranch::Booking);
                assert_eq!(reply.text, BOOKING_HANDOFF);
                assert!(!reply.uncertain);
            }
        }
    }

    #[test]
    fn booking_emoji_only_when_allowed() {
        let allowed =
            config(ResponseLength::Normal, FormatPreference::Paragraphs, EmojiPolicy::Allowed);
        let sparingly =
            config(ResponseLength::Normal, FormatPreference::Paragraphs, EmojiPolicy::Sparingly);

        let shouted = always().respond("Can I BOOK a slot?", &allowed);
        assert_eq!(shouted, format!("{BOOKING_HANDOFF} 📅"));
        assert_eq!(always().respond("Can I book a slot?", &sparingly), BOOKING_HANDOFF);
    }

    #[test]
    fn order_intent_short_circuits() {
        let config =
            config(ResponseLength::Detailed, FormatPreference::Bullets, EmojiPolicy::Never);
        let reply = always().simulate("Where is my order #1234?", &config);

        assert_eq!(reply.branch, ReplyBranch::Order);
        assert_eq!(reply.text, ORDER_HANDOFF);
    }

    #[test]
    fn concise_install_reply_is_never_reshaped() {
        for format in FormatPreference::ALL {
            let config = config(ResponseLength::Concise, *format, EmojiPolicy::Never);
            assert_eq!(never().respond(INSTALL_QUESTION, &config), INSTALL_CONCISE.join(" "));
        }
    }

    #[test]
    fn normal_install_reply_follows_format_preference() {
        let bullets = never().respond(
            INSTALL_QUESTION,
            &config(ResponseLength::Normal, FormatPreference::Bullets, EmojiPolicy::Never),
        );
        let steps = never().respond(
            INSTALL_QUESTION,
            &config(ResponseLength::Detailed, FormatPreference::Steps, EmojiPolicy::Never),
        );
        let paragraph = never().respond(
            INSTALL_QUESTION,
            &config(ResponseLength::Normal, FormatPreference::Paragraphs, EmojiPolicy::Never),
        );

        assert_eq!(bullets.lines().count(), 3);
        assert!(bullets.lines().all(|line| line.starts_with("• ")));
        assert_eq!(steps.lines().count(), 4);
        assert!(steps.starts_with("1. ") && steps.contains("\n4. "));
        assert_eq!(paragraph.lines().count(), 1);
    }

    #[test]
    fn emoji_shaping_variants() {
        let question = "hello";
        let never_text = never().respond(
            question,
            &config(ResponseLength::Concise, FormatPreference::Paragraphs, EmojiPolicy::Never),
        );
        let sparingly_text = never().respond(
            question,
            &config(ResponseLength::Concise, FormatPreference::Paragraphs, EmojiPolicy::Sparingly),
        );
        let allowed_text = never().respond(
            question,
            &config(ResponseLength::Concise, FormatPreference::Paragraphs, EmojiPolicy::Allowed),
        );

        assert_eq!(never_text, "Got it! How else can I help?");
        assert_eq!(sparingly_text, "Got it! How else can I help? 🙂");
        assert_eq!(sparingly_text.matches('🙂').count(), 1);
        assert!(allowed_text.starts_with("👋 ") && allowed_text.ends_with(" 🚀"));
    }

    #[test]
    fn uncertainty_clause_follows_when_unsure() {
        let mut config =
            config(ResponseLength::Concise, FormatPreference::Paragraphs, EmojiPolicy::Never);

        config.behavior.when_unsure = WhenUnsure::Clarify;
        let clarify = always().respond(INSTALL_QUESTION, &config);
        assert!(clarify.ends_with(CLARIFY_QUESTION));

        config.behavior.when_unsure = WhenUnsure::Admit;
        let admit = always().respond(INSTALL_QUESTION, &config);
        assert!(admit.contains("not completely sure"));
        assert!(admit.contains("\n1. ") && admit.contains("\n2. ") && admit.contains("\n3. "));

        config.behavior.when_unsure = WhenUnsure::Escalate;
        config.behavior.escalation_message = "Our team will email you shortly.".to_string();
        let escalate = always().respond(INSTALL_QUESTION, &config);
        assert!(escalate.ends_with("\n\nOur team will email you shortly."));

        config.behavior.escalation_message = "   ".to_string();
        let fallback = always().respond(INSTALL_QUESTION, &config);
        assert!(fallback.ends_with("Let me connect you with a member of our team."));
    }

    #[test]
    fn forced_branches_are_independent_of_randomness() {
        let config =
            config(ResponseLength::Normal, FormatPreference::Paragraphs, EmojiPolicy::Never);
        assert!(always().simulate(INSTALL_QUESTION, &config).uncertain);
        assert!(!never().simulate(INSTALL_QUESTION, &config).uncertain);
    }

    #[test]
    fn general_branch_never_injects_uncertainty() {
        let config =
            config(ResponseLength::Normal, FormatPreference::Paragraphs, EmojiPolicy::Never);
        for utterance in ["", "   ", "What are your opening hours?"] {
            let reply = always().simulate(utterance, &config);
            assert_eq!(reply.branch, ReplyBranch::General, "{utterance:?}");
            assert!(!reply.uncertain);
        }
    }

    #[test]
    fn seeded_injection_rate_is_thirty_percent() {
        let config =
            config(ResponseLength::Normal, FormatPreference::Bullets, EmojiPolicy::Sparingly);
        let mut engine = ResponsePolicyEngine::seeded(20_260_101);
        let runs = 10_000;

        let uncertain = (0..runs)
            .filter(|_| engine.simulate(INSTALL_QUESTION, &config).uncertain)
            .count();
        let rate = uncertain as f64 / runs as f64;

        assert!((rate - 0.30).abs() <= 0.02, "observed rate {rate}");
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let config = config(ResponseLength::Normal, FormatPreference::Steps, EmojiPolicy::Allowed);
        let mut first = ResponsePolicyEngine::seeded(9);
        let mut second = ResponsePolicyEngine::seeded(9);

        for _ in 0..50 {
            assert_eq!(
                first.respond(INSTALL_QUESTION, &config),
                second.respond(INSTALL_QUESTION, &config)
            );
        }
    }

    #[test]
    fn probability_override_is_clamped() {
        let config = config(ResponseLength::Normal, FormatPreference::Steps, EmojiPolicy::Never);
        let mut engine = ResponsePolicyEngine::seeded(1).with_probability(4.0);
        assert!((0..20).all(|_| engine.simulate(INSTALL_QUESTION, &config).uncertain));

        let mut engine = ResponsePolicyEngine::seeded(1).with_probability(-1.0);
        assert!((0..20).all(|_| !engine.simulate(INSTALL_QUESTION, &config).uncertain));
    }
}
