// Whitespace normalization for `${...}` spans

/// Removes whitespace inside every `${...}` span of `text`, except inside single- or
/// double-quoted substrings. Text outside the spans is copied unchanged.
pub fn normalize_expressions(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_span = false;
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if !in_span {
            result.push(ch);
            if ch == '$' && chars.peek() == Some(&'{') {
                result.push('{');
                chars.next();
                in_span = true;
            }
            continue;
        }

        match quote {
            Some(q) => {
                result.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    result.push(ch);
                }
                '}' => {
                    in_span = false;
                    result.push(ch);
                }
                c if c.is_whitespace() => {}
                c => result.push(c),
            },
        }
    }

    result
}

/// Normalizes the `${...}` spans inside each string literal of a raw JSON document.
///
/// A span never extends past the end of the string it starts in, and text outside
/// string literals is copied unchanged. Escapes are kept as written, so `\"` inside
/// an expression still counts as a quote.
pub fn normalize_document(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars();

    while let Some(ch) = chars.next() {
        result.push(ch);
        if ch != '"' {
            continue;
        }

        let mut content = String::new();
        let mut closed = false;
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    content.push(ch);
                    if let Some(escaped) = chars.next() {
                        content.push(escaped);
                    }
                }
                '"' => {
                    closed = true;
                    break;
                }
                _ => content.push(ch),
            }
        }

        result.push_str(&normalize_expressions(&content));
        if closed {
            result.push('"');
        }
    }

    result
}
