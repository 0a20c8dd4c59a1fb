//! Built-in tip and quiz content for each cohort

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, ContentCatalog};
use crate::errors::Result;
use crate::Cohort;

/// Key into the translation tables; rendered by a `Localizer`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipItem(String);

impl TipItem {
    pub const SIGN_IN_KEY: &'static str = "tips.sign_in";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Shown instead of a personalized tip when nobody is signed in
    pub fn sign_in() -> Self {
        Self::new(Self::SIGN_IN_KEY)
    }

    pub fn is_sign_in(&self) -> bool {
        self.0 == Self::SIGN_IN_KEY
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl CatalogEntry for TipItem {
    fn check(&self) -> std::result::Result<(), String> {
        if self.0.trim().is_empty() {
            return Err("tip key must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correct")]
    pub correct_index: usize,
    pub explanation: String,
    pub tip: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

impl CatalogEntry for QuizQuestion {
    fn check(&self) -> std::result::Result<(), String> {
        if self.options.len() < 2 {
            return Err(format!(
                "question {} needs at least 2 options, has {}",
                self.id,
                self.options.len()
            ));
        }
        if self.correct_index >= self.options.len() {
            return Err(format!(
                "question {} marks option {} correct but has {} options",
                self.id,
                self.correct_index,
                self.options.len()
            ));
        }
        Ok(())
    }

    fn check_sequence(items: &[Self]) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for question in items {
            if !seen.insert(question.id) {
                return Err(format!("duplicate question id {}", question.id));
            }
        }
        Ok(())
    }
}

const STUDENT_TIPS: &[(&str, &str)] = &[
    (
        "tips.student.verify_links",
        "Check where a link really points before you tap it, even when a friend sent it.",
    ),
    (
        "tips.student.public_wifi",
        "Skip banking and shopping on campus Wi-Fi; use mobile data or a VPN instead.",
    ),
    (
        "tips.student.unique_passwords",
        "Use a different password for your college portal, email, and social apps.",
    ),
    (
        "tips.student.free_offers",
        "\"Free textbooks\" and exam-leak offers are classic bait. Use official libraries.",
    ),
];

const PROFESSIONAL_TIPS: &[(&str, &str)] = &[
    (
        "tips.professional.verify_it_requests",
        "IT never asks for your password by email. Call the helpdesk on its official number.",
    ),
    (
        "tips.professional.byod",
        "Keep work and personal data apart on your phone and follow the BYOD policy.",
    ),
    (
        "tips.professional.invoice_fraud",
        "Confirm any change of bank details on an invoice through a known contact.",
    ),
    (
        "tips.professional.mfa",
        "Turn on multi-factor authentication for work email and cloud accounts.",
    ),
];

const HOMEMAKER_TIPS: &[(&str, &str)] = &[
    (
        "tips.homemaker.job_fees",
        "Genuine employers never charge a registration fee for work-from-home jobs.",
    ),
    (
        "tips.homemaker.app_permissions",
        "Check an app's permissions and reviews before your children install it.",
    ),
    (
        "tips.homemaker.delivery_scams",
        "Parcel \"delivery failed\" messages asking for a small fee are usually scams.",
    ),
    (
        "tips.homemaker.parental_controls",
        "Set up parental controls and talk to your children about privacy early.",
    ),
];

const RURAL_TIPS: &[(&str, &str)] = &[
    (
        "tips.rural.never_share_pin",
        "Your bank will never ask for your PIN or OTP on a call. Hang up and call the bank.",
    ),
    (
        "tips.rural.keep_phone",
        "Do not hand your phone to strangers offering to set up mobile banking.",
    ),
    (
        "tips.rural.subsidy_scams",
        "Government subsidies never require you to pay a fee to an agent by UPI.",
    ),
    (
        "tips.rural.branch_help",
        "Visit your bank branch for help; staff can set up mobile banking safely.",
    ),
];

const SENIOR_TIPS: &[(&str, &str)] = &[
    (
        "tips.senior.fake_popups",
        "Real antivirus never shows scary pop-ups asking you to call a number.",
    ),
    (
        "tips.senior.grandparent_scam",
        "If a relative urgently asks for money, call another family member to check first.",
    ),
    (
        "tips.senior.pension_calls",
        "Pension offices do not ask for bank details over the phone.",
    ),
    (
        "tips.senior.ask_for_help",
        "It is fine to pause and ask someone you trust before paying anyone online.",
    ),
];

pub(crate) const SIGN_IN_TEXT: &str = "Please login to get personalized tips.";

fn tip_table(cohort: Cohort) -> &'static [(&'static str, &'static str)] {
    match cohort {
        Cohort::Student => STUDENT_TIPS,
        Cohort::Professional => PROFESSIONAL_TIPS,
        Cohort::Homemaker => HOMEMAKER_TIPS,
        Cohort::Rural => RURAL_TIPS,
        Cohort::Senior => SENIOR_TIPS,
    }
}

/// English texts for every built-in tip key, including the sign-in sentinel
pub fn builtin_tip_texts() -> impl Iterator<Item = (&'static str, &'static str)> {
    Cohort::ALL
        .into_iter()
        .flat_map(|cohort| tip_table(cohort).iter().copied())
        .chain(std::iter::once((TipItem::SIGN_IN_KEY, SIGN_IN_TEXT)))
}

pub fn builtin_tips() -> Result<ContentCatalog<TipItem>> {
    ContentCatalog::from_pairs(Cohort::ALL.iter().map(|cohort| {
        let items = tip_table(*cohort)
            .iter()
            .map(|(key, _)| TipItem::new(*key))
            .collect();
        (*cohort, items)
    }))
}

fn question(
    id: u32,
    question: &str,
    options: [&str; 4],
    correct_index: usize,
    explanation: &str,
    tip: &str,
) -> QuizQuestion {
    QuizQuestion {
        id,
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_index,
        explanation: explanation.to_string(),
        tip: tip.to_string(),
    }
}

pub fn builtin_quiz() -> Result<ContentCatalog<QuizQuestion>> {
    ContentCatalog::from_pairs(vec![
        (
            Cohort::Student,
            vec![
                question(
                    1,
                    "Your friend sends you a link to 'download free textbooks' via WhatsApp. What should you do?",
                    [
                        "Click immediately - free textbooks!",
                        "Check if the website is legitimate first",
                        "Share it with other friends",
                        "Download without thinking",
                    ],
                    1,
                    "Always verify links before clicking. Scammers often use attractive offers like 'free textbooks' to trick students.",
                    "Use official educational websites and libraries for legitimate resources.",
                ),
                question(
                    2,
                    "You're using public Wi-Fi at your college cafe. Which activity is SAFE?",
                    [
                        "Online banking",
                        "Checking social media",
                        "Shopping with credit card",
                        "Accessing email with passwords",
                    ],
                    1,
                    "Public Wi-Fi is not secure. Only browse non-sensitive content. Avoid banking, shopping, or accessing accounts with personal data.",
                    "Use your mobile data or a VPN for sensitive activities on public networks.",
                ),
            ],
        ),
        (
            Cohort::Professional,
            vec![
                question(
                    1,
                    "You receive an urgent email from 'IT Support' asking for your login credentials to fix a security issue. What do you do?",
                    [
                        "Reply with username and password immediately",
                        "Call IT department to verify the request",
                        "Forward the email to colleagues",
                        "Ignore the email completely",
                    ],
                    1,
                    "Legitimate IT departments never ask for passwords via email. Always verify such requests through official channels.",
                    "When in doubt, call your IT department using the official number, not the one in the suspicious email.",
                ),
                question(
                    2,
                    "Your company allows personal devices for work (BYOD). What's the most important security measure?",
                    [
                        "Using the same password for work and personal apps",
                        "Installing a mobile device management (MDM) solution",
                        "Connecting to any available Wi-Fi",
                        "Sharing work files via personal cloud storage",
                    ],
                    1,
                    "MDM solutions help separate work and personal data, ensuring company data remains secure on personal devices.",
                    "Always follow your company's BYOD policy and keep work and personal data separate.",
                ),
            ],
        ),
        (
            Cohort::Homemaker,
            vec![
                question(
                    1,
                    "You see an ad on Facebook offering a 'work from home' opportunity requiring a small registration fee. What's your best response?",
                    [
                        "Pay immediately to secure the opportunity",
                        "Research the company thoroughly first",
                        "Share it with friends and family",
                        "Provide personal information to learn more",
                    ],
                    1,
                    "Legitimate employers never ask for upfront fees. This is a common scam targeting people looking for flexible work.",
                    "Research companies through official websites, check reviews, and never pay fees to get a job.",
                ),
                question(
                    2,
                    "Your child wants to download a new game app. What should you check first?",
                    [
                        "If the app is free",
                        "App permissions and reviews",
                        "If friends are playing it",
                        "The app's graphics quality",
                    ],
                    1,
                    "Always check what permissions an app requests and read reviews. Some apps collect unnecessary personal data.",
                    "Use parental controls and teach children about digital privacy from an early age.",
                ),
            ],
        ),
        (
            Cohort::Rural,
            vec![
                question(
                    1,
                    "You receive a call claiming to be from your bank, asking to verify your PIN for a 'security update'. What should you do?",
                    [
                        "Provide the PIN since they called from the bank",
                        "Hang up and call your bank directly",
                        "Ask them to call back later",
                        "Give partial information to be safe",
                    ],
                    1,
                    "Banks never ask for PINs or passwords over the phone. Scammers often target rural areas with such calls.",
                    "Always hang up and call your bank using the official number on your bank card or statement.",
                ),
                question(
                    2,
                    "Someone offers to help you set up mobile banking and asks for your phone to 'make it easier'. What do you do?",
                    [
                        "Hand over your phone - they're being helpful",
                        "Politely decline and visit the bank branch instead",
                        "Let them help but watch closely",
                        "Ask them to explain verbally while you do it",
                    ],
                    1,
                    "Never let others handle your phone for financial apps. Visit your bank branch for official assistance with mobile banking setup.",
                    "Bank staff can guide you through mobile banking setup at the branch safely.",
                ),
            ],
        ),
        (
            Cohort::Senior,
            vec![
                question(
                    1,
                    "You receive a pop-up on your computer saying 'Your computer is infected! Call this number immediately!' What should you do?",
                    [
                        "Call the number immediately",
                        "Close the pop-up and run your antivirus",
                        "Click to scan your computer",
                        "Pay for the 'urgent' fix",
                    ],
                    1,
                    "These are fake security warnings designed to scare you. Close the pop-up and use your legitimate antivirus software.",
                    "Real security software doesn't use scary pop-ups or ask you to call phone numbers.",
                ),
                question(
                    2,
                    "Your grandchild calls urgently needing money wired for an 'emergency'. They sound different and won't video call. What do you do?",
                    [
                        "Send money immediately - family emergency!",
                        "Call your grandchild's parents to verify",
                        "Ask for more details over the phone",
                        "Send a smaller amount to be safe",
                    ],
                    1,
                    "This is a common 'grandparent scam'. Scammers research families and pretend to be relatives in distress.",
                    "Always verify by calling other family members or asking questions only your real grandchild would know.",
                ),
            ],
        ),
    ])
}
