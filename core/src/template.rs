//! URL template tokenizer.
//!
//! A template such as `{ver}/draft{prospects}{year}` is split once, at
//! registry load, into literal text and `{name}` placeholders. Resolution
//! then walks the segments in order and never has to rescan the output for
//! leftover braces.

/// One piece of a tokenized URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A tokenized URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Tokenize `source`. Fails on unbalanced or nested braces and on empty
    /// placeholder names.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices();

        while let Some((start, c)) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(format!("nested '{{' at offset {start} in {source:?}")),
                            c => name.push(c),
                        }
                    }
                    if !closed {
                        return Err(format!("unclosed '{{' at offset {start} in {source:?}"));
                    }
                    if name.is_empty() {
                        return Err(format!("empty placeholder at offset {start} in {source:?}"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => return Err(format!("unmatched '}}' at offset {start} in {source:?}")),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    fn ph(s: &str) -> Segment {
        Segment::Placeholder(s.to_string())
    }

    #[test]
    fn splits_literals_and_placeholders_in_order() {
        let t = Template::parse("{ver}/draft{prospects}{year}{latest}").unwrap();
        assert_eq!(
            t.segments(),
            &[ph("ver"), lit("/draft"), ph("prospects"), ph("year"), ph("latest")]
        );
        assert_eq!(
            t.placeholders().collect::<Vec<_>>(),
            vec!["ver", "prospects", "year", "latest"]
        );
    }

    #[test]
    fn template_without_placeholders_is_one_literal() {
        let t = Template::parse("v1/sports").unwrap();
        assert_eq!(t.segments(), &[lit("v1/sports")]);
        assert_eq!(t.placeholders().count(), 0);
    }

    #[test]
    fn trailing_literal_is_kept() {
        let t = Template::parse("{ver}/game/{gamePk}/feed/live").unwrap();
        assert_eq!(
            t.segments(),
            &[ph("ver"), lit("/game/"), ph("gamePk"), lit("/feed/live")]
        );
        assert_eq!(t.as_str(), "{ver}/game/{gamePk}/feed/live");
    }

    #[test]
    fn rejects_unclosed_placeholder() {
        let err = Template::parse("{ver/teams").unwrap_err();
        assert!(err.contains("unclosed"), "{err}");
    }

    #[test]
    fn rejects_stray_closing_brace() {
        let err = Template::parse("v1}/teams").unwrap_err();
        assert!(err.contains("unmatched"), "{err}");
    }

    #[test]
    fn rejects_nested_and_empty_placeholders() {
        assert!(Template::parse("{a{b}}").is_err());
        assert!(Template::parse("v1/{}").is_err());
    }
}
