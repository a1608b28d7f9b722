// src/services/agent.rs
use async_trait::async_trait;

use super::{Responder, ResponderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Wedding,
    Birthday,
    Sympathy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Greeting,
    Event(EventKind),
    Availability,
    Pricing,
    Delivery,
    Produce,
    Medical,
    Unknown,
}

fn has_word(haystack: &str, words: &[&str]) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| words.contains(&w))
}

fn has_phrase(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| haystack.contains(p))
}

const MEDICAL: &[&str] = &[
    "medical", "medicine", "medicines", "cure", "cures", "treatment", "dosage", "dose",
    "remedy", "remedies", "sick", "illness",
];
const WEDDING: &[&str] = &["wedding", "weddings", "bride", "bridal", "bouquet", "bouquets"];
const BIRTHDAY: &[&str] = &["birthday", "birthdays", "anniversary"];
const SYMPATHY: &[&str] = &["sympathy", "funeral", "condolence", "condolences", "memorial"];
const DELIVERY: &[&str] = &[
    "deliver", "delivers", "delivery", "deliveries", "ship", "ships", "shipping", "pickup",
];
const PRICING: &[&str] = &["price", "prices", "pricing", "cost", "costs", "expensive", "cheap"];
const AVAILABILITY: &[&str] = &["available", "availability", "stock"];
const PRODUCE: &[&str] = &[
    "herb", "herbs", "fruit", "fruits", "vegetable", "vegetables", "veggie", "veggies", "basil",
    "tomato", "tomatoes", "berries",
];
const GREETING: &[&str] = &["hello", "hi", "hey", "howdy", "morning"];

pub fn detect_topic(msg: &str) -> Topic {
    let msg_lower = msg.to_lowercase();
    let msg = msg_lower.as_str();

    // Health questions are declined before anything else matches.
    if has_word(msg, MEDICAL) {
        Topic::Medical
    } else if has_word(msg, WEDDING) {
        Topic::Event(EventKind::Wedding)
    } else if has_word(msg, BIRTHDAY) {
        Topic::Event(EventKind::Birthday)
    } else if has_word(msg, SYMPATHY) {
        Topic::Event(EventKind::Sympathy)
    } else if has_word(msg, DELIVERY) || has_phrase(msg, &["pick up"]) {
        Topic::Delivery
    } else if has_word(msg, PRICING) || has_phrase(msg, &["how much"]) {
        Topic::Pricing
    } else if has_word(msg, AVAILABILITY) || has_phrase(msg, &["in season", "sold out"]) {
        Topic::Availability
    } else if has_word(msg, PRODUCE) {
        Topic::Produce
    } else if has_word(msg, GREETING) {
        Topic::Greeting
    } else {
        Topic::Unknown
    }
}

pub fn generate_reply(user_msg: &str) -> String {
    reply_for(detect_topic(user_msg))
}

pub fn reply_for(topic: Topic) -> String {
    use Topic::*;

    match topic {
        Greeting => "Hey there, welcome to Kranian Farms! 🌻 Looking for flowers, herbs, \
                     or something fresh from the field today?"
            .to_string(),

        Event(EventKind::Wedding) => "Congrats on the big day! 💐 Peonies, garden roses and \
                                      eucalyptus make a gorgeous wedding mix. What colors are you \
                                      dreaming of?"
            .to_string(),

        Event(EventKind::Birthday) => "Birthdays call for something bright! Sunflowers, gerberas \
                                       or a mixed wildflower bunch always bring a smile. \
                                       Who's it for?"
            .to_string(),

        Event(EventKind::Sympathy) => "I'm so sorry for your loss. White lilies, soft roses and \
                                       chrysanthemums are a gentle choice. Would you like help \
                                       putting together an arrangement?"
            .to_string(),

        Availability => "What we have depends on the season and the harvest. Tell me what you \
                         have in mind and I'll let you know what's fresh, or check the shop on \
                         kranianfarms.com for today's picks."
            .to_string(),

        Pricing => "Prices vary with the season and the size of the order. You'll find current \
                    prices on kranianfarms.com, and for bigger event orders our support team is \
                    happy to put together a quote."
            .to_string(),

        Delivery => "We offer local delivery and farm pickup. 🚚 Delivery areas and times are \
                     listed at checkout on kranianfarms.com. Need it for a specific date?"
            .to_string(),

        Produce => "Our herbs, fruits and veggies are picked fresh. 🌿 Are you cooking something \
                    special, or stocking up for the week?"
            .to_string(),

        Medical => "I'm just the farm helper, so I can't give health or medical advice. A doctor \
                    or pharmacist is the right person to ask."
            .to_string(),

        Unknown => "Hmm, I'm not totally sure what you're looking for. Could you tell me a bit \
                    more? You can also reach our support team through kranianfarms.com."
            .to_string(),
    }
}

/// In-process responder speaking as the Kranian Farms assistant.
#[derive(Debug, Default, Clone)]
pub struct LocalAgent;

impl LocalAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Responder for LocalAgent {
    async fn respond(&self, text: &str) -> Result<String, ResponderError> {
        if text.trim().is_empty() {
            return Err(ResponderError::Agent("empty message".to_string()));
        }
        let topic = detect_topic(text);
        tracing::debug!(?topic, "agent reply generated");
        Ok(reply_for(topic))
    }

    fn name(&self) -> &'static str {
        "agent"
    }
}
