//! CyberAware - personalized cybersecurity awareness content
//!
//! The learner's demographic group (cohort) drives what they see:
//! - Cohort resolution from a stored profile, defaulting to `student`
//! - Random safety tips drawn from the cohort's curated set
//! - A scored quiz session per cohort with an explicit state machine
//! - Localized tip texts with locale fallback

pub mod catalog;
pub mod config;
pub mod content;
pub mod errors;
pub mod localization;
pub mod profile;
pub mod quiz;
pub mod telemetry;
pub mod tips;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand_core::RngCore;
use serde::{Deserialize, Serialize};

use catalog::ContentCatalog;
use content::{QuizQuestion, TipItem};
use localization::{LocaleCatalog, Localizer};
use profile::{CohortResolver, ProfileLookup};
use quiz::{QuizEngine, QuizSession};
use tips::TipSelector;

/// Demographic group used to personalize content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    Student,
    Professional,
    Homemaker,
    Rural,
    Senior,
}

/// Display metadata for a cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CohortProfile {
    pub label: &'static str,
    pub description: &'static str,
}

impl Cohort {
    pub const ALL: [Cohort; 5] = [
        Cohort::Student,
        Cohort::Professional,
        Cohort::Homemaker,
        Cohort::Rural,
        Cohort::Senior,
    ];

    /// Used whenever a cohort is missing, unknown, or has no content
    pub const FALLBACK: Cohort = Cohort::Student;

    pub fn as_str(&self) -> &'static str {
        match self {
            Cohort::Student => "student",
            Cohort::Professional => "professional",
            Cohort::Homemaker => "homemaker",
            Cohort::Rural => "rural",
            Cohort::Senior => "senior",
        }
    }

    /// Interpret a stored demographic field; anything unrecognised is `student`
    pub fn from_demographic(value: Option<&str>) -> Cohort {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(Cohort::FALLBACK)
    }

    pub fn profile(&self) -> CohortProfile {
        let (label, description) = match self {
            Cohort::Student => ("Student", "Learning and exploring technology"),
            Cohort::Professional => ("Professional", "Working in corporate environment"),
            Cohort::Homemaker => ("Homemaker", "Managing household and family"),
            Cohort::Rural => ("Rural Community", "Living in rural areas"),
            Cohort::Senior => ("Senior Citizen", "Experienced and wise"),
        };
        CohortProfile { label, description }
    }
}

impl Default for Cohort {
    fn default() -> Self {
        Cohort::FALLBACK
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Cohort {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Cohort {
    type Err = errors::AwarenessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Cohort::ALL
            .iter()
            .copied()
            .find(|cohort| cohort.as_str() == value)
            .ok_or_else(|| errors::AwarenessError::UnknownCohort {
                value: value.to_string(),
            })
    }
}

/// Entry point bundling catalogs, profile lookup and localization
pub struct AwarenessEngine {
    config: config::AwarenessConfig,
    resolver: CohortResolver,
    tips: TipSelector,
    quiz: QuizEngine,
    localizer: Arc<dyn Localizer>,
}

impl AwarenessEngine {
    /// Load content as configured: JSON overrides where given, built-ins otherwise
    pub fn new(
        config: config::AwarenessConfig,
        profiles: Arc<dyn ProfileLookup>,
    ) -> errors::Result<Self> {
        config.validate()?;

        let tips = match &config.tips_catalog_path {
            Some(path) => ContentCatalog::from_json_file(path)?,
            None => content::builtin_tips()?,
        };
        let quiz = match &config.quiz_catalog_path {
            Some(path) => ContentCatalog::from_json_file(path)?,
            None => content::builtin_quiz()?,
        };

        let mut locales = LocaleCatalog::builtin(&config.locale, &config.fallback_locale);
        for (locale, path) in &config.translation_paths {
            locales.load_json_file(locale, path)?;
        }

        Ok(Self::with_parts(
            config,
            profiles,
            Arc::new(tips),
            Arc::new(quiz),
            Arc::new(locales),
        ))
    }

    pub fn with_parts(
        config: config::AwarenessConfig,
        profiles: Arc<dyn ProfileLookup>,
        tips: Arc<ContentCatalog<TipItem>>,
        quiz: Arc<ContentCatalog<QuizQuestion>>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            resolver: CohortResolver::new(profiles, &config),
            tips: TipSelector::new(tips),
            quiz: QuizEngine::new(quiz),
            localizer,
            config,
        }
    }

    pub fn config(&self) -> &config::AwarenessConfig {
        &self.config
    }

    pub async fn resolve_cohort(&self, user_id: &str) -> Cohort {
        self.resolver.resolve_cohort(user_id).await
    }

    pub fn select_tip<R: RngCore>(&self, cohort: &str, rng: &mut R) -> TipItem {
        self.tips.select_tip(cohort, rng)
    }

    pub async fn select_tip_for_user<R: RngCore>(
        &self,
        user_id: Option<&str>,
        rng: &mut R,
    ) -> TipItem {
        self.tips
            .select_tip_for_user(&self.resolver, user_id, rng)
            .await
    }

    /// Tip for the user, rendered in the active locale
    pub async fn tip_text_for_user<R: RngCore>(
        &self,
        user_id: Option<&str>,
        rng: &mut R,
    ) -> String {
        let tip = self.select_tip_for_user(user_id, rng).await;
        self.translate(&tip)
    }

    pub fn translate(&self, tip: &TipItem) -> String {
        self.localizer.translate(tip.key())
    }

    pub fn start_session(&self, cohort: &str) -> QuizSession {
        self.quiz.start_session(cohort)
    }

    /// Signed-out learners get the `student` quiz
    pub async fn start_session_for_user(&self, user_id: Option<&str>) -> QuizSession {
        let cohort = match user_id {
            Some(user_id) => self.resolve_cohort(user_id).await,
            None => Cohort::FALLBACK,
        };
        self.start_session(cohort.as_str())
    }

    pub fn restart(&self, session: &QuizSession) -> QuizSession {
        self.quiz.restart(session)
    }
}
