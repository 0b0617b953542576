//! Per-turn assistant orchestration
//!
//! classify → resolve data through the tiered sources → template → append
//! to the transcript → best-effort speech. The engine owns the panel
//! open/closed flag so the delayed handoff redirect is observable without
//! any UI attached.
//!
//! Fee and rate answers use the strict chain: live API, then the bundled
//! document, then an explicit unavailability message — wrong financial
//! figures are never substituted silently here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::assistant::classifier::{classify, Intent};
use crate::assistant::lang::{detect_language, Language};
use crate::assistant::session::ChatSession;
use crate::assistant::templates;
use crate::config::DEFAULT_HANDOFF_DELAY;
use crate::fallback::{first_success, SourceStep, Tier};
use crate::fees::{self, FeeApiClient};
use crate::models::{FeeGroup, Message};
use crate::rates::{self, ExchangeRateClient};
use crate::speech::{select_voice, SpeechRecognizer, SpeechSynthesizer};
use crate::state::ClientStateStore;

/// Where a handoff sends the user once the panel closes.
pub const VIDEO_HELP_TARGET: &str = "#/video-help";

/// Non-reply side effect of a turn that the hosting panel must apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelAction {
    None,
    /// The panel will close on its own after the handoff delay; the host
    /// should then surface the video-help entry point.
    CloseAndRedirect { target: &'static str },
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub language: Language,
    pub action: PanelAction,
}

impl TurnOutcome {
    fn reply_only(reply: impl Into<String>, language: Language) -> Self {
        Self {
            reply: reply.into(),
            language,
            action: PanelAction::None,
        }
    }
}

pub struct AssistantEngine {
    fees: FeeApiClient,
    rates: ExchangeRateClient,
    store: Arc<dyn ClientStateStore>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    session: ChatSession,
    open: Arc<AtomicBool>,
    listening: Arc<AtomicBool>,
    handoff_delay: Duration,
}

impl AssistantEngine {
    pub fn new(
        fees: FeeApiClient,
        rates: ExchangeRateClient,
        store: Arc<dyn ClientStateStore>,
    ) -> Self {
        Self {
            fees,
            rates,
            store,
            synthesizer: None,
            recognizer: None,
            session: ChatSession::new(),
            open: Arc::new(AtomicBool::new(false)),
            listening: Arc::new(AtomicBool::new(false)),
            handoff_delay: DEFAULT_HANDOFF_DELAY,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_handoff_delay(mut self, delay: Duration) -> Self {
        self.handoff_delay = delay;
        self
    }

    /// Restore the recent-queries list persisted by an earlier visit.
    /// Load failures start from an empty list.
    pub async fn hydrate(&mut self) {
        match self.store.load_recent_queries().await {
            Ok(queries) => self.session.set_recent_queries(queries),
            Err(error) => warn!("Recent-query hydration failed, starting empty: {}", error),
        }
    }

    pub fn open_panel(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    pub fn close_panel(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub fn transcript(&self) -> &[Message] {
        self.session.messages()
    }

    pub fn recent_queries(&self) -> &[String] {
        self.session.recent_queries()
    }

    /// Run one turn. `None` means the input was blank and nothing happened.
    pub async fn handle_message(&mut self, raw: &str) -> Option<TurnOutcome> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.session.push_user(text);
        self.remember_query(text).await;

        let language = detect_language(text);
        let intent = classify(text, self.session.pending());
        info!("Classified intent {:?} (language {:?})", intent, language);

        let outcome = match intent {
            Intent::FeeInquiry { group } => self.answer_fees(group, language).await,
            Intent::RateInquiry => self.answer_rates(language).await,
            Intent::ReferralInquiry => {
                TurnOutcome::reply_only(templates::referral(language), language)
            }
            Intent::AgentHandoff => self.begin_handoff(language),
            Intent::Fallback => TurnOutcome::reply_only(templates::fallback(language), language),
        };

        self.session.push_assistant(&outcome.reply);
        self.speak(&outcome.reply, language);

        Some(outcome)
    }

    async fn answer_fees(&mut self, group: Option<FeeGroup>, language: Language) -> TurnOutcome {
        let client = self.fees.clone();
        let schedule = first_success(vec![
            SourceStep::new(Tier::Live, async move { client.fetch_schedule().await }),
            SourceStep::new(Tier::Bundled, async { Ok(fees::fallback_schedule()) }),
        ])
        .await;

        let Some(schedule) = schedule else {
            return TurnOutcome::reply_only(templates::FEES_UNAVAILABLE, language);
        };

        match group {
            Some(group) => {
                self.session.clear_pending();
                let listing =
                    templates::fee_listing(group, schedule.value.group(group), language);
                TurnOutcome::reply_only(listing, language)
            }
            None => {
                self.session.await_fee_group();
                TurnOutcome::reply_only(templates::fee_prompt(language), language)
            }
        }
    }

    async fn answer_rates(&mut self, language: Language) -> TurnOutcome {
        let client = self.rates.clone();
        let pair = first_success(vec![
            SourceStep::new(Tier::Live, async move { client.fetch_pair().await }),
            SourceStep::new(Tier::Bundled, async { Ok(rates::fallback_pair()) }),
        ])
        .await;

        match pair {
            Some(sourced) if sourced.value.is_usable() => {
                TurnOutcome::reply_only(templates::rate_summary(&sourced.value, language), language)
            }
            _ => TurnOutcome::reply_only(templates::RATES_UNAVAILABLE, language),
        }
    }

    /// Reply lands immediately; the panel closes on its own after the delay.
    fn begin_handoff(&mut self, language: Language) -> TurnOutcome {
        let open = Arc::clone(&self.open);
        let delay = self.handoff_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            open.store(false, Ordering::SeqCst);
        });

        TurnOutcome {
            reply: templates::agent_redirect(language).to_string(),
            language,
            action: PanelAction::CloseAndRedirect {
                target: VIDEO_HELP_TARGET,
            },
        }
    }

    async fn remember_query(&mut self, text: &str) {
        self.session.push_recent(text);

        if let Err(error) = self
            .store
            .save_recent_queries(self.session.recent_queries())
            .await
        {
            warn!("Recent-query save failed, turn continues: {}", error);
        }
    }

    fn speak(&self, text: &str, language: Language) {
        let Some(synth) = &self.synthesizer else {
            return;
        };

        let voices = synth.voices();
        let voice = select_voice(&voices, language);

        // Interrupt any utterance still playing before starting the new one.
        synth.cancel();
        if let Err(error) = synth.speak(text, voice.as_ref()) {
            warn!("Speech synthesis failed: {}", error);
        }
    }

    /// Capture one utterance and submit it as if typed. Returns the hint
    /// outcome when voice input is unavailable, and `None` when a session
    /// is already active or produced no transcript.
    pub async fn listen_and_send(&mut self) -> Option<TurnOutcome> {
        let Some(recognizer) = self.recognizer.clone() else {
            let outcome = TurnOutcome::reply_only(templates::VOICE_UNSUPPORTED, Language::English);
            self.session.push_assistant(&outcome.reply);
            self.speak(&outcome.reply, Language::English);
            return Some(outcome);
        };

        // Recognition is exclusive: one session per panel at a time.
        if self.listening.swap(true, Ordering::SeqCst) {
            return None;
        }

        let captured = recognizer.capture_utterance().await;
        self.listening.store(false, Ordering::SeqCst);

        match captured {
            Ok(Some(transcript)) if !transcript.trim().is_empty() => {
                self.handle_message(&transcript).await
            }
            Ok(_) => None,
            Err(error) => {
                warn!("Voice capture failed, reverting to manual input: {}", error);
                None
            }
        }
    }
}
