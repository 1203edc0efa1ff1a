use scraper::{ElementRef, Html, Node};

use super::token::Token;

enum Step<'a> {
    Enter(ElementRef<'a>),
    Text(&'a str),
    Leave(&'a str),
}

/// Parses tag soup with html5ever and replays the tree as a token stream.
///
/// Comments, doctypes and processing instructions are dropped. The walk is
/// iterative so deeply nested pages cannot exhaust the stack.
pub fn tokenize_html(html: &str) -> Vec<Token> {
    let document = Html::parse_document(html);
    let mut tokens = Vec::new();
    let mut stack = vec![Step::Enter(document.root_element())];

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(element) => {
                let el = element.value();
                tokens.push(Token::StartTag {
                    name: el.name().to_string(),
                    attrs: el
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                });
                stack.push(Step::Leave(el.name()));

                let children: Vec<_> = element.children().collect();
                for child in children.into_iter().rev() {
                    match child.value() {
                        Node::Text(text) => stack.push(Step::Text(&**text)),
                        Node::Element(_) => {
                            if let Some(el) = ElementRef::wrap(child) {
                                stack.push(Step::Enter(el));
                            }
                        }
                        _ => {}
                    }
                }
            }
            Step::Text(text) => tokens.push(Token::Characters(text.to_string())),
            Step::Leave(name) => tokens.push(Token::EndTag {
                name: name.to_string(),
            }),
        }
    }

    tokens.push(Token::EndDocument);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_stream_for_tag_soup() {
        let tokens = tokenize_html("<p>one<p>two <b>bold</b>");
        let starts = tokens
            .iter()
            .filter(|t| matches!(t, Token::StartTag { .. }))
            .count();
        let ends = tokens
            .iter()
            .filter(|t| matches!(t, Token::EndTag { .. }))
            .count();
        assert_eq!(starts, ends);
        assert_eq!(tokens.last(), Some(&Token::EndDocument));
        assert!(tokens.contains(&Token::text("one")));
        assert!(tokens.contains(&Token::text("bold")));
    }

    #[test]
    fn body_is_synthesized() {
        let tokens = tokenize_html("just text");
        assert!(tokens.contains(&Token::start("body")));
        assert!(tokens.contains(&Token::text("just text")));
    }

    #[test]
    fn attributes_are_kept() {
        let tokens = tokenize_html(r#"<font size="+1">x</font>"#);
        assert!(tokens.iter().any(|t| matches!(
            t,
            Token::StartTag { name, attrs } if name == "font" && attrs.contains(&("size".to_string(), "+1".to_string()))
        )));
    }

    #[test]
    fn comments_are_dropped() {
        let tokens = tokenize_html("<p>a<!-- hidden -->b</p>");
        assert!(!tokens
            .iter()
            .any(|t| matches!(t, Token::Characters(s) if s.contains("hidden"))));
    }
}
