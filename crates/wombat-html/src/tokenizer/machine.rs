use strum_macros::Display;
use tracing::trace;

use super::token::Token;

/// Elements whose contents are raw text up to the matching end tag.
///
/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title", "xmp"];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The subset of the tokenizer state machine needed to build element trees.
/// Character references are left undecoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RawText,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state),
    /// consumed up to the closing `>` and dropped.
    Doctype,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
pub struct HTMLTokenizer {
    state: TokenizerState,
    input: String,
    current_pos: usize,
    current_input_character: Option<char>,
    current_token: Option<Token>,
    token_stream: Vec<Token>,
    // "Reconsume in the X state" sets this flag.
    reconsume: bool,
    // The current attribute duplicates an earlier one. Its value is still
    // consumed into it, and it is removed once the attribute is finished.
    discard_current_attribute: bool,
    last_start_tag_name: Option<String>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// "The initial state is the data state."
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            state: TokenizerState::Data,
            input,
            current_pos: 0,
            current_input_character: None,
            current_token: None,
            token_stream: Vec::new(),
            reconsume: false,
            discard_current_attribute: false,
            last_start_tag_name: None,
        }
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after `run()` to get the tokens for the tree builder.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Run the state machine over the whole input. The stream always ends
    /// with [`Token::EndOfFile`].
    pub fn run(&mut self) {
        loop {
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.consume();
            }

            if self.current_input_character.is_none() {
                self.flush_pending_at_eof();
                self.token_stream.push(Token::EndOfFile);
                break;
            }

            match self.state {
                TokenizerState::Data => self.handle_data_state(),
                TokenizerState::RawText => self.handle_raw_text_state(),
                TokenizerState::TagOpen => self.handle_tag_open_state(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
                TokenizerState::TagName => self.handle_tag_name_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeName => self.handle_attribute_name_state(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state('"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state('\'');
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.handle_attribute_value_unquoted_state();
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state();
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
                TokenizerState::BogusComment => self.handle_bogus_comment_state(),
                TokenizerState::Comment => self.handle_comment_state(),
                TokenizerState::Doctype => self.handle_doctype_state(),
            }
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
            None => {}
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Only an appropriate end tag leaves this state; any other `<` is text.
    fn handle_raw_text_state(&mut self) {
        match self.current_input_character {
            Some('<') if self.appropriate_end_tag_follows() => {
                self.switch_to(TokenizerState::TagOpen);
            }
            Some(c) => self.emit_character_token(c),
            None => {}
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.handle_markup_declaration_open(),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token... Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - ... Reconsume in the bogus comment state."
            Some('?') => {
                self.log_parse_error("unexpected-question-mark-instead-of-tag-name");
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the data state."
            _ => {
                self.log_parse_error("invalid-first-character-of-tag-name");
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Entered with the `!` already consumed, so the checks look at what follows it.
    fn handle_markup_declaration_open(&mut self) {
        if self.next_few_characters_are("--") {
            self.advance(2);
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::Comment);
        } else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.advance(7);
            self.switch_to(TokenizerState::Doctype);
        } else {
            self.log_parse_error("incorrectly-opened-comment");
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name parse error.
            // Switch to the data state."
            Some('>') => {
                self.log_parse_error("missing-end-tag-name");
                self.switch_to(TokenizerState::Data);
            }
            _ => {
                self.log_parse_error("invalid-first-character-of-tag-name");
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            // "ASCII upper alpha - Append the lowercase version..."
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name(c.to_ascii_lowercase());
                }
            }
            None => {}
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => {
                self.check_duplicate_attribute();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_name(c.to_ascii_lowercase());
                }
            }
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => self.emit_current_tag(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
            None => {}
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-attribute-value parse error."
            Some('>') => {
                self.log_parse_error("missing-attribute-value");
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(c);
                }
            }
            None => {}
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('>') => self.emit_current_tag(),
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(c);
                }
            }
            None => {}
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            _ => {
                self.log_parse_error("missing-whitespace-between-attributes");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.set_self_closing();
                }
                self.emit_current_tag();
            }
            _ => {
                self.log_parse_error("unexpected-solidus-in-tag");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.emit_token();
                self.switch_to(TokenizerState::Data);
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_comment(c);
                }
            }
            None => {}
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// Collapses the comment end dash states: the comment ends at the first `-->`.
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('-') if self.next_few_characters_are("->") => {
                self.advance(2);
                self.emit_token();
                self.switch_to(TokenizerState::Data);
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_comment(c);
                }
            }
            None => {}
        }
    }

    fn handle_doctype_state(&mut self) {
        if self.current_input_character == Some('>') {
            self.switch_to(TokenizerState::Data);
        }
    }
}

// State transitions, input and emission helpers.
impl HTMLTokenizer {
    fn switch_to(&mut self, new_state: TokenizerState) {
        trace!(from = %self.state, to = %new_state, "tokenizer state");
        self.state = new_state;
    }

    fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.switch_to(new_state);
    }

    /// "Consume the next input character"
    fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    fn advance(&mut self, count: usize) {
        for _ in 0..count {
            let _ = self.consume();
        }
    }

    /// "If the next few characters are..."
    fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input[self.current_pos..]
            .get(..target.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(target))
    }

    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    fn appropriate_end_tag_follows(&self) -> bool {
        let Some(name) = self.last_start_tag_name.as_deref() else {
            return false;
        };
        let rest = &self.input[self.current_pos..];
        let Some(after_solidus) = rest.strip_prefix('/') else {
            return false;
        };
        let Some(candidate) = after_solidus.get(..name.len()) else {
            return false;
        };
        candidate.eq_ignore_ascii_case(name)
            && after_solidus[name.len()..]
                .chars()
                .next()
                .is_none_or(|c| c == '>' || c == '/' || is_whitespace_char(c))
    }

    /// "Emit the current token." Start tags of raw text elements switch the
    /// tokenizer to the RAWTEXT state.
    fn emit_current_tag(&mut self) {
        self.finish_attribute();
        let mut next_state = TokenizerState::Data;
        if let Some(Token::StartTag { name, .. }) = &self.current_token {
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                next_state = TokenizerState::RawText;
            }
            self.last_start_tag_name = Some(name.clone());
        }
        self.emit_token();
        self.switch_to(next_state);
    }

    fn emit_token(&mut self) {
        if let Some(token) = self.current_token.take() {
            self.token_stream.push(token);
        }
    }

    fn emit_character_token(&mut self, c: char) {
        self.token_stream.push(Token::Character { data: c });
    }

    /// EOF inside a comment emits the comment; EOF inside a tag drops the tag.
    fn flush_pending_at_eof(&mut self) {
        match self.state {
            TokenizerState::Comment | TokenizerState::BogusComment => self.emit_token(),
            TokenizerState::Data | TokenizerState::RawText | TokenizerState::Doctype => {}
            TokenizerState::TagOpen => self.emit_character_token('<'),
            _ => {
                self.log_parse_error("eof-in-tag");
                self.current_token = None;
                self.discard_current_attribute = false;
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// Called when leaving the attribute name state.
    fn check_duplicate_attribute(&mut self) {
        let is_duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);
        if is_duplicate {
            self.log_parse_error("duplicate-attribute");
            self.discard_current_attribute = true;
        }
    }

    /// Drop the attribute just finished if it was a duplicate.
    fn finish_attribute(&mut self) {
        if !std::mem::take(&mut self.discard_current_attribute) {
            return;
        }
        if let Some(token) = self.current_token.as_mut() {
            token.remove_current_attribute();
        }
    }

    fn start_new_attribute(&mut self) {
        self.finish_attribute();
        if let Some(token) = self.current_token.as_mut() {
            token.start_new_attribute();
        }
    }

    fn log_parse_error(&self, code: &str) {
        trace!(position = self.current_pos, code, "HTML parse error");
    }
}

/// "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED, U+0020 SPACE"
const fn is_whitespace_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | ' ' | '\r')
}
