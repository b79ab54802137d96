/// Engine.io open packet as sent by a socket.io v4 server on a fresh
/// WebSocket connection.
pub fn engine_open_fixture(sid: &str) -> String {
    return format!(
        r#"0{{"sid":"{sid}","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}}"#
    );
}

pub fn long_reply_fixture() -> &'static str {
    return r#"
Thanks for reaching out! Here is what happens next.

First we book a short call to understand the space you are working with, the appliances you want to keep and the budget you have in mind.

Then a designer prepares two layouts. You can ask for changes as many times as you need.
"#
    .trim();
}
