//! URI-shaped payloads: mailto, sms, geo, wa.me, bitcoin and the social
//! platforms that take a handle rather than a full URL.

use crate::intent::{BitcoinFields, EmailFields, GeoFields, MessageFields, TwitterFields, UsernameFields};

use super::{encode_component, QueryTail};

pub(super) fn mailto(email: &EmailFields) -> String {
    QueryTail::default()
        .escaped("subject", &email.subject)
        .escaped("body", &email.body)
        .append_to(format!("mailto:{}", email.email))
}

pub(super) fn sms(sms: &MessageFields) -> String {
    QueryTail::default()
        .escaped("body", &sms.message)
        .append_to(format!("sms:{}", sms.phone))
}

pub(super) fn geo(geo: &GeoFields) -> String {
    format!("geo:{},{}", or_zero(&geo.latitude), or_zero(&geo.longitude))
}

fn or_zero(value: &str) -> &str {
    if value.is_empty() { "0" } else { value }
}

/// `https://wa.me/<digits>`; every non-digit is dropped from the number.
pub(super) fn whatsapp(chat: &MessageFields) -> String {
    let digits: String = chat.phone.chars().filter(|c| c.is_ascii_digit()).collect();
    QueryTail::default()
        .escaped("text", &chat.message)
        .append_to(format!("https://wa.me/{digits}"))
}

/// BIP-21 style URI. The amount is a bare decimal and is not escaped.
pub(super) fn bitcoin(payment: &BitcoinFields) -> String {
    QueryTail::default()
        .raw("amount", &payment.amount)
        .escaped("label", &payment.label)
        .escaped("message", &payment.message)
        .append_to(format!("bitcoin:{}", payment.address))
}

/// Tweet intent when there is text to post, profile URL otherwise.
pub(super) fn twitter(twitter: &TwitterFields) -> String {
    if twitter.tweet_text.is_empty() {
        format!("https://twitter.com/{}", handle(&twitter.username))
    } else {
        format!(
            "https://twitter.com/intent/tweet?text={}",
            encode_component(&twitter.tweet_text)
        )
    }
}

pub(super) fn instagram(profile: &UsernameFields) -> String {
    format!("https://instagram.com/{}", handle(&profile.username))
}

/// Strips one leading `@`.
fn handle(username: &str) -> &str {
    username.strip_prefix('@').unwrap_or(username)
}
