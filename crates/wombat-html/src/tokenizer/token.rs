/// An attribute on a start tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer emits tokens of these types to the tree builder. DOCTYPE
/// tokens are dropped by the tokenizer since the tree has no use for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes"
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes on end tags are parsed and discarded.
    EndTag {
        /// "a tag name"
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// "Comment and character tokens have data."
    Character {
        /// "data"
        data: char,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// A start tag with an empty name, no attributes and the self-closing flag unset.
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// An end tag with an empty name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
        }
    }

    /// A comment token with empty data.
    #[must_use]
    pub const fn new_comment() -> Self {
        Self::Comment {
            data: String::new(),
        }
    }

    /// Mutation helpers for use during tokenization. Calls on a token of the
    /// wrong kind are ignored; the state machine never makes them.
    pub fn append_to_tag_name(&mut self, c: char) {
        if let Self::StartTag { name, .. } | Self::EndTag { name } = self {
            name.push(c);
        }
    }

    /// "Set the self-closing flag of the current tag token."
    pub fn set_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    /// "Start a new attribute in the current tag token."
    ///
    /// End tags get no attribute list, so this is a no-op for them.
    pub fn start_new_attribute(&mut self) {
        if let Self::StartTag { attributes, .. } = self {
            attributes.push(Attribute {
                name: String::new(),
                value: String::new(),
            });
        }
    }

    /// "Append the current input character to the current attribute's name."
    pub fn append_to_current_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.current_attribute_mut() {
            attr.name.push(c);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub fn append_to_current_attribute_value(&mut self, c: char) {
        if let Some(attr) = self.current_attribute_mut() {
            attr.value.push(c);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same name,
    /// then this is a duplicate-attribute parse error"
    #[must_use]
    pub fn current_attribute_name_is_duplicate(&self) -> bool {
        let Self::StartTag { attributes, .. } = self else {
            return false;
        };
        attributes
            .split_last()
            .is_some_and(|(current, earlier)| earlier.iter().any(|a| a.name == current.name))
    }

    /// "the new attribute must be removed from the token"
    pub fn remove_current_attribute(&mut self) {
        if let Self::StartTag { attributes, .. } = self {
            let _ = attributes.pop();
        }
    }

    /// "Append the current input character to the comment token's data."
    pub fn append_to_comment(&mut self, c: char) {
        if let Self::Comment { data } = self {
            data.push(c);
        }
    }

    fn current_attribute_mut(&mut self) -> Option<&mut Attribute> {
        match self {
            Self::StartTag { attributes, .. } => attributes.last_mut(),
            _ => None,
        }
    }
}
