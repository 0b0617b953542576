//! Canned replies and dynamic line templates
//!
//! Every non-dynamic reply is a static string selected by (intent,
//! language). Fee and rate answers interpolate fetched data into
//! language-specific line templates.

use crate::assistant::lang::Language;
use crate::models::{FeeCategories, FeeGroup, RatePair};

pub const GREETING: &str =
    "Hi! I'm your swap assistant. Ask me about fees, rates, or referrals.";

pub const FEES_UNAVAILABLE: &str = "Sorry, fee details are currently unavailable.";

pub const RATES_UNAVAILABLE: &str =
    "Sorry, I couldn't fetch the latest rates at the moment. Please try again later.";

pub const VOICE_UNSUPPORTED: &str =
    "Voice input is not supported on this device. Please type your question.";

pub fn fee_prompt(lang: Language) -> &'static str {
    match lang {
        Language::English => "Do you want Customer or Business fees?",
        Language::Pidgin => "You wan see Customer fee or Business fee?",
        Language::Yoruba => "Ṣé o fẹ́ rí owó iṣẹ́ oníbàárà tàbí ti ilé-iṣẹ́?",
        Language::Igbo => "Ị chọrọ ịhụ ụgwọ ndị ahịa ma ọ bụ nke azụmahịa?",
        Language::Hausa => "Kana son ganin kudin Abokin ciniki ko na kasuwanci?",
    }
}

pub fn referral(lang: Language) -> &'static str {
    match lang {
        Language::English => {
            "To refer someone, copy your swap tag or referral link and share it with your friends. \
             When your friend signs up with your link and completes a swap, you both get rewarded."
        }
        Language::Pidgin => {
            "To refer person, just copy your swap tag or referral link share am give your padi. \
             If dem use am register and swap, both of una go get reward."
        }
        Language::Yoruba => {
            "Lati fi ẹnikan ṣàlàyé, daakọ swap tag rẹ tàbí ìjápọ ìtọ́ka, pín in fún ọ̀rẹ́ rẹ. \
             Tí ọ̀rẹ́ rẹ bá forúkọ sílẹ̀ tí ó sì ṣe paṣipaarọ̀, ẹ̀yin méjèèjì ní yóò gba ẹ̀bùn."
        }
        Language::Igbo => {
            "Ị chọrọ ịkpọ mmadụ, detuo swap tag gị ma ọ bụ njikọ ntụpụta, kee ya nye enyi gị. \
             Mgbe enyi gị debanyere aha jiri ya mee swap, unu abụọ ga-enweta onyinye."
        }
        Language::Hausa => {
            "Don gayyatar mutum, kwafe swap tag ɗinka ko hanyar gayyata ka aika wa abokinka. \
             Idan abokinka ya shiga da hanyar kuma yayi swap, ku duka zaku sami lada."
        }
    }
}

pub fn fallback(lang: Language) -> &'static str {
    match lang {
        Language::English => {
            "I can help with FX rates, fees, and referrals. Try asking: 'What's the current dollar to naira rate?'"
        }
        Language::Pidgin => {
            "I fit help with dollar rate, fee, or referral. Try ask: 'How much dollar dey?'"
        }
        Language::Yoruba => {
            "Mo lè ràn ẹ́ lọ́wọ́ pẹ̀lú owó paṣipaarọ̀, àwọn owó iṣẹ́, tàbí ìtọ́ka. Béèrè bí owó ṣe ń lọ."
        }
        Language::Igbo => {
            "M nwere ike inyere gị aka na ego mgbanwe, ụgwọ, na ntụpụta. Jụọ mụ: 'Kedu dollar na Naira ugbu a?'"
        }
        Language::Hausa => {
            "Zan iya taimaka maka da farashin musaya, kudade, da gayyata. Tambayi: 'Yaya dala ke yanzu?'"
        }
    }
}

pub fn agent_redirect(lang: Language) -> &'static str {
    match lang {
        Language::English => {
            "I understand you'd like to speak with a live agent. I'm connecting you to our Video Help \
             section where you can start a video call with an agent. Redirecting now..."
        }
        Language::Pidgin => {
            "I understand say you want talk to live agent. I dey connect you to Video Help section \
             where you fit start video call with agent. I dey redirect you now..."
        }
        Language::Yoruba => {
            "Mo yé pé o fẹ́ sọ̀rọ̀ pẹ̀lú agbẹ́nusọ́ ọ̀tún. Mo ń sọ̀rọ̀ sí apá ìrànlọ́wọ́ fídíò tí o lè \
             bẹ̀rẹ̀ ìpè fídíò pẹ̀lú agbẹ́nusọ́. Mo ń ṣẹ̀wọ́n níbayìí..."
        }
        Language::Igbo => {
            "Aghọtara m na ịchọrọ ịgwa onye ọrụ dị ndụ. Ana m eji gị na ngalaba Enyemaka Video ebe ị \
             nwere ike ịmalite oku vidiyo na onye ọrụ. Ana m eweghachi gị ugbu a..."
        }
        Language::Hausa => {
            "Na fahimci cewa kuna son yin magana da wakili na rayuwa. Ina haɗa ku zuwa sashen Taimako \
             na Bidiyo inda za ku iya fara kiran bidiyo tare da wakili. Ina juya ku yanzu..."
        }
    }
}

/// Fee listing: language-specific header word, shared category/line layout.
pub fn fee_listing(group: FeeGroup, categories: &FeeCategories, lang: Language) -> String {
    let header_word = match lang {
        Language::English | Language::Pidgin => "fees",
        Language::Yoruba => "owo iṣẹ́",
        Language::Igbo => "ụgwọ",
        Language::Hausa => "kudade",
    };

    let mut reply = format!("{} {}:\n", group, header_word);
    for (category, items) in categories {
        reply.push_str(&format!("\n{}:\n", category));
        for item in items {
            reply.push_str(&format!("- {}: {}\n", item.service, item.fee));
        }
    }

    reply.trim_end().to_string()
}

/// Both directional rates in one line (or two, for English).
pub fn rate_summary(pair: &RatePair, lang: Language) -> String {
    match lang {
        Language::English => format!(
            "Current rates:\n$1 = ₦{}\n₦1 = ${:.4}",
            group_thousands(pair.usd_ngn),
            pair.ngn_usd
        ),
        Language::Pidgin => format!(
            "Dollar to Naira now na ₦{}. Naira to Dollar na ${}.",
            pair.usd_ngn, pair.ngn_usd
        ),
        Language::Yoruba => format!(
            "Dọla kan to Naira jẹ́ ₦{}, Naira kan to Dollar jẹ́ ${}.",
            pair.usd_ngn, pair.ngn_usd
        ),
        Language::Igbo => format!(
            "Dọla 1 ka Naira bụ ₦{}, Naira 1 bụ ${}.",
            pair.usd_ngn, pair.ngn_usd
        ),
        Language::Hausa => format!(
            "Dala 1 yanzu ya kai ₦{}, Naira 1 ya kai ${}.",
            pair.usd_ngn, pair.ngn_usd
        ),
    }
}

/// Comma-grouped integer part, two decimals only when fractional.
fn group_thousands(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let whole = rounded.trunc() as i64;
    let frac = (rounded.fract().abs() * 100.0).round() as u32;

    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    if frac == 0 {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{:02}", sign, grouped, frac)
    }
}
