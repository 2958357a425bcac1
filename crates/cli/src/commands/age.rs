//! Age gate.

use jvapes_storefront::Session;
use jvapes_storefront::render::HtmlRenderer;

use crate::console;

/// Record the confirmation.
pub async fn confirm(session: &mut Session<HtmlRenderer>) {
    session.confirm_age().await;
    console::print("Age confirmed. Welcome!");
}

/// The gate stays up.
pub fn decline(session: &mut Session<HtmlRenderer>) {
    session.decline_age();
    console::print(console::AGE_DECLINED);
}

/// Print whether the gate is still up.
pub fn status(session: &Session<HtmlRenderer>) {
    if session.age_gate_required() {
        console::print(console::AGE_GATE_NOTICE);
    } else {
        console::print("Age confirmed.");
    }
}
