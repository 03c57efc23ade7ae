use std::fmt;
use std::fmt::{Display, Formatter};

use pest_consume::{match_nodes, Error, Parser};

use crate::envelope::ROOT_TOKEN;
use crate::error::BridgeError;

#[derive(Parser)]
#[grammar = "resolver/receiver.pest"] // relative to src
pub struct ReceiverParser;

type ParseResult<T> = std::result::Result<T, Error<Rule>>;
type Node<'i> = pest_consume::Node<'i, Rule, ()>;

/// A parsed envelope receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// The root context itself.
    Root,
    /// Namespace segments walked from the root, first segment first.
    Path(Vec<String>),
}

impl Receiver {
    pub fn parse(text: &str) -> Result<Receiver, BridgeError> {
        let nodes = ReceiverParser::parse(Rule::receiver, text)
            .map_err(|e| invalid(text, e))?;
        let node = nodes.single().map_err(|e| invalid(text, e))?;
        ReceiverParser::receiver(node).map_err(|e| invalid(text, e))
    }

    pub fn segments(&self) -> &[String] {
        match self {
            Receiver::Root => &[],
            Receiver::Path(segments) => segments,
        }
    }
}

impl Display for Receiver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Root => write!(f, "{}", ROOT_TOKEN),
            Receiver::Path(segments) => write!(f, "{}", segments.join(".")),
        }
    }
}

/// Split a registration path such as `"math.square"` into its segments.
pub fn parse_target(text: &str) -> Result<Vec<String>, BridgeError> {
    let nodes = ReceiverParser::parse(Rule::target, text).map_err(|e| invalid(text, e))?;
    let node = nodes.single().map_err(|e| invalid(text, e))?;
    ReceiverParser::target(node).map_err(|e| invalid(text, e))
}

fn invalid(text: &str, e: Error<Rule>) -> BridgeError {
    BridgeError::InvalidReceiver {
        receiver: text.to_string(),
        detail: e.variant.message().to_string(),
    }
}

#[pest_consume::parser]
impl ReceiverParser {
    #[allow(non_snake_case)]
    fn EOI(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn root(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn segment(input: Node) -> ParseResult<String> {
        Ok(input.as_str().to_string())
    }

    fn path(input: Node) -> ParseResult<Vec<String>> {
        Ok(match_nodes!(input.into_children();
            [segment(segments)..] => segments.collect(),
        ))
    }

    fn receiver(input: Node) -> ParseResult<Receiver> {
        Ok(match_nodes!(input.into_children();
            [root(_), EOI(_)] => Receiver::Root,
            [path(segments), EOI(_)] => Receiver::Path(segments),
        ))
    }

    fn target(input: Node) -> ParseResult<Vec<String>> {
        Ok(match_nodes!(input.into_children();
            [path(segments), EOI(_)] => segments,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{ReceiverParser, Rule};

    use pest::consumes_to;
    use pest::parses_to;

    #[test]
    fn test_root_token() {
        parses_to! {
            parser: ReceiverParser,
            input: "this",
            rule: Rule::receiver,
            tokens: [
                receiver(0, 4, [
                    root(0, 4),
                    EOI(4, 4)
                ])
            ]
        };
    }

    #[test]
    fn test_dotted_path() {
        parses_to! {
            parser: ReceiverParser,
            input: "a.bc",
            rule: Rule::receiver,
            tokens: [
                receiver(0, 4, [
                    path(0, 4, [
                        segment(0, 1),
                        segment(2, 4)
                    ]),
                    EOI(4, 4)
                ])
            ]
        };
    }

    #[test]
    fn test_root_prefix_is_a_segment() {
        parses_to! {
            parser: ReceiverParser,
            input: "thisWorker",
            rule: Rule::receiver,
            tokens: [
                receiver(0, 10, [
                    path(0, 10, [
                        segment(0, 10)
                    ]),
                    EOI(10, 10)
                ])
            ]
        };
    }
}
