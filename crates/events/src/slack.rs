//! Slack Block Kit payloads for pipeline events.

use promptsheet_core::links::{image_url, sheet_row_url};
use promptsheet_core::notification::Notification;
use promptsheet_core::text::{truncate_chars, MAX_ERROR_CHARS, MAX_PROMPT_EXCERPT_CHARS};
use serde_json::{json, Value};

/// Build the webhook payload for an event.
pub fn build_message(event: &Notification) -> Value {
    match event {
        Notification::ImageReady {
            spreadsheet_id,
            row_number,
            index,
            file_id,
            prompt,
            is_base,
        } => {
            let tag = if *is_base { "[base]" } else { "[variant]" };
            let title = format!("Image ready — row {row_number} (#{index}) {tag}");
            json!({
                "text": title,
                "blocks": [
                    header_block(&title, spreadsheet_id, *row_number),
                    code_block("", truncate_chars(prompt, MAX_PROMPT_EXCERPT_CHARS)),
                    {
                        "type": "image",
                        "image_url": image_url(file_id),
                        "alt_text": "preview",
                    },
                ]
            })
        }
        Notification::GenerationFailed {
            spreadsheet_id,
            row_number,
            index,
            prompt,
            error,
        } => {
            let title = format!("Generation failed — row {row_number} (#{index})");
            json!({
                "text": title,
                "blocks": [
                    header_block(&title, spreadsheet_id, *row_number),
                    code_block("Prompt:\n", truncate_chars(prompt, MAX_PROMPT_EXCERPT_CHARS)),
                    code_block("Error:\n", truncate_chars(error, MAX_ERROR_CHARS)),
                ]
            })
        }
    }
}

fn header_block(title: &str, spreadsheet_id: &str, row_number: u32) -> Value {
    json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": format!("*{title}*\n<{}|Open row>", sheet_row_url(spreadsheet_id, row_number)),
        }
    })
}

fn code_block(label: &str, body: &str) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": format!("{label}```\n{body}\n```") }
    })
}
