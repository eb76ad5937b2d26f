//! Style sheet text to media blocks.
//!
//! Rules outside `@media` go into global blocks with an empty condition set.
//! Each `@media` rule becomes a block of its own, except that consecutive
//! blocks with equal conditions share one block. Source order is kept.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, ParseErrorKind as CssErrorKind, Parser,
    ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
    StyleSheetParser,
};
use log::{debug, warn};

use crate::container::MediaBlockList;
use crate::error::{Error, ParseErrorKind};
use crate::media::MediaConditionSet;
use crate::style::{Selector, StyleSheet, parse_declaration_block, parse_selector_list};

/// Custom error carried through cssparser.
#[derive(Debug, Clone, PartialEq)]
enum RuleError {
    /// An at-rule we do not handle; skipped.
    Unsupported,
    /// A selector list that failed to parse; the rule is skipped.
    InvalidSelector,
    /// Aborts the whole load.
    Invalid(ParseErrorKind),
}

/// Parse `source` and append its media blocks to `blocks`.
///
/// `begin_line_number` is the line of `source` within its document and is
/// added to reported line numbers. Returns the number of style rules parsed.
/// On error `blocks` may hold part of the input and should be discarded.
pub fn parse_media_blocks(
    source: &str,
    begin_line_number: u32,
    blocks: &mut MediaBlockList,
) -> crate::Result<usize> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);
    let mut rule_parser = TopLevelRuleParser {
        blocks,
        first_line: begin_line_number,
        rule_count: 0,
    };

    let stylesheet_parser = StyleSheetParser::new(&mut parser, &mut rule_parser);
    for result in stylesheet_parser {
        if let Err((error, slice)) = result {
            if let Some(error) = fatal(&error, begin_line_number) {
                return Err(error);
            }
            report_skipped(&error, slice, begin_line_number);
        }
    }

    Ok(rule_parser.rule_count)
}

/// cssparser lines are 0-based within `source`; `first_line` is the
/// document line `source` starts on.
fn fatal(error: &ParseError<'_, RuleError>, first_line: u32) -> Option<Error> {
    match &error.kind {
        CssErrorKind::Custom(RuleError::Invalid(kind)) => Some(Error::Parse {
            line: error.location.line + first_line,
            column: error.location.column,
            kind: kind.clone(),
        }),
        _ => None,
    }
}

fn report_skipped(error: &ParseError<'_, RuleError>, slice: &str, first_line: u32) {
    // unsupported at-rules are logged where they are found
    if !matches!(error.kind, CssErrorKind::Custom(RuleError::Unsupported)) {
        warn!(
            "skipping invalid rule `{}` at {}:{}",
            slice.trim(),
            error.location.line + first_line,
            error.location.column
        );
    }
}

fn parse_selectors<'i>(
    input: &mut Parser<'i, '_>,
) -> Result<Vec<Selector>, ParseError<'i, RuleError>> {
    parse_selector_list(input)
        .map_err(|error| error.location.new_custom_error(RuleError::InvalidSelector))
}

fn parse_style_rule(
    selectors: Vec<Selector>,
    input: &mut Parser<'_, '_>,
    first_line: u32,
    sheet: &mut StyleSheet,
) {
    let properties = parse_declaration_block(input, first_line);
    for selector in selectors {
        sheet.add_rule(selector, &properties);
    }
}

/// Parser for top-level rules.
struct TopLevelRuleParser<'a> {
    blocks: &'a mut MediaBlockList,
    first_line: u32,
    rule_count: usize,
}

impl<'i> AtRuleParser<'i> for TopLevelRuleParser<'_> {
    /// `None` for media types that never apply to a screen.
    type Prelude = Option<MediaConditionSet>;
    type AtRule = ();
    type Error = RuleError;

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        if !name.eq_ignore_ascii_case("media") {
            debug!("skipping unsupported @{} rule", name);
            return Err(input.new_custom_error(RuleError::Unsupported));
        }

        let start = input.position();
        MediaConditionSet::parse(input).map_err(|error| {
            while input.next().is_ok() {}
            let query = input.slice_from(start).trim().to_string();
            error.location.new_custom_error(RuleError::Invalid(
                ParseErrorKind::InvalidMediaQuery(query),
            ))
        })
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let mut style_sheet = StyleSheet::new();
        let mut body_parser = MediaRuleParser {
            style_sheet: &mut style_sheet,
            first_line: self.first_line,
            rule_count: 0,
        };

        for result in RuleBodyParser::new(input, &mut body_parser) {
            if let Err((error, slice)) = result {
                if matches!(error.kind, CssErrorKind::Custom(RuleError::Invalid(_))) {
                    return Err(error);
                }
                report_skipped(&error, slice, self.first_line);
            }
        }
        self.rule_count += body_parser.rule_count;

        match prelude {
            Some(conditions) => self
                .blocks
                .last_or_push(conditions)
                .style_sheet
                .merge(&style_sheet),
            None => debug!(
                "dropping {} rules of a @media block for another media type",
                style_sheet.len()
            ),
        }
        Ok(())
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = Vec<Selector>;
    type QualifiedRule = ();
    type Error = RuleError;

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        parse_selectors(input)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let block = self.blocks.last_or_push(MediaConditionSet::new());
        parse_style_rule(prelude, input, self.first_line, &mut block.style_sheet);
        self.rule_count += 1;
        Ok(())
    }
}

/// Parser for the rules inside an `@media` block.
struct MediaRuleParser<'a> {
    style_sheet: &'a mut StyleSheet,
    first_line: u32,
    rule_count: usize,
}

impl<'i> AtRuleParser<'i> for MediaRuleParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = RuleError;

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        if name.eq_ignore_ascii_case("media") {
            return Err(input.new_custom_error(RuleError::Invalid(
                ParseErrorKind::NestedMediaRule,
            )));
        }
        debug!("skipping unsupported @{} rule inside @media", name);
        Err(input.new_custom_error(RuleError::Unsupported))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(RuleError::Unsupported))
    }
}

impl<'i> QualifiedRuleParser<'i> for MediaRuleParser<'_> {
    type Prelude = Vec<Selector>;
    type QualifiedRule = ();
    type Error = RuleError;

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        parse_selectors(input)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        parse_style_rule(prelude, input, self.first_line, self.style_sheet);
        self.rule_count += 1;
        Ok(())
    }
}

impl<'i> DeclarationParser<'i> for MediaRuleParser<'_> {
    type Declaration = ();
    type Error = RuleError;

    fn parse_value<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(RuleError::Unsupported))
    }
}

impl<'i> RuleBodyItemParser<'i, (), RuleError> for MediaRuleParser<'_> {
    fn parse_declarations(&self) -> bool {
        false
    }
    fn parse_qualified(&self) -> bool {
        true
    }
}
