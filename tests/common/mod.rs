// Common test utilities shared across test files

use serde_json::{json, Value};

/// Wrap a body in an AdaptiveCard envelope and serialize it
#[allow(dead_code)]
pub fn card(body: Value) -> String {
    json!({
        "type": "AdaptiveCard",
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "version": "1.5",
        "body": body
    })
    .to_string()
}

/// Parse rendered output and return its body
#[allow(dead_code)]
pub fn rendered_body(output: &str) -> Value {
    let card: Value = serde_json::from_str(output).expect("Rendered output is not JSON");
    card["body"].clone()
}

/// A response card of the shape generated for API operations
#[allow(dead_code)]
pub fn pet_card() -> String {
    card(json!([
        {
            "type": "TextBlock",
            "text": "id: ${if(id, id, 'N/A')}",
            "wrap": true
        },
        {
            "type": "TextBlock",
            "text": "name: ${if(name, name, 'N/A')}",
            "wrap": true
        },
        {
            "$when": "${photoUrl != null && photoUrl != ''}",
            "type": "Image",
            "url": "${photoUrl}"
        },
        {
            "type": "Container",
            "$data": "${tags}",
            "items": [
                {
                    "type": "TextBlock",
                    "text": "tag: ${name} (owner ${$root.name})",
                    "wrap": true
                }
            ]
        }
    ]))
}
