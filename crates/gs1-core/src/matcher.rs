//! # Matcher — Ordered Rule Chains
//!
//! A validation is an ordered list of [`Rule`]s. Each rule is a regex
//! pattern, a message template and an optional semantic predicate over the
//! pattern's captures. Rules run strictly in order and the first failure
//! stops the chain, so a later rule may index into any capture an earlier
//! rule proved exists.
//!
//! There are up to four chains per AI type, keyed by direction (URN or
//! Digital Link) and level (instance or class). All of them are generated
//! from the [`AiDescriptor`] table and compiled once on first use; there is
//! no hand-written per-type chain.
//!
//! ## Message Templates
//!
//! Templates interpolate `{input}` (the string under validation) and `{gcp}`
//! (the company prefix length from the [`ValidationContext`]).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::checksum::verify_check_digit_at;
use crate::descriptor::{classify, AiDescriptor, AiType, PayloadWidth, SerialPlacement, DESCRIPTORS};
use crate::error::ValidationError;
use crate::fields::{unit_len, DigitalLink};
use crate::identifier::{Direction, Level, ValidationContext};

/// Host part shared by every Digital Link pattern.
const ORIGIN: &str = r"^https?://[^/?#\s]+/";

/// Error category a rule reports when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Prefix, structure, digit count, charset.
    Grammar,
    /// Company prefix length presence, bounds and fit.
    CompanyPrefix,
    /// Check digit verification.
    Checksum,
}

type SemanticCheck = Box<dyn Fn(&Captures<'_>, &ValidationContext) -> bool + Send + Sync>;

/// One step of a validation chain.
pub struct Rule {
    kind: RuleKind,
    pattern: Regex,
    message: String,
    check: Option<SemanticCheck>,
}

impl Rule {
    fn pattern(kind: RuleKind, pattern: &Regex, message: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.clone(),
            message: message.into(),
            check: None,
        }
    }

    fn semantic(
        kind: RuleKind,
        pattern: &Regex,
        message: impl Into<String>,
        check: impl Fn(&Captures<'_>, &ValidationContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            pattern: pattern.clone(),
            message: message.into(),
            check: Some(Box::new(check)),
        }
    }

    /// The error category this rule reports.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The uninterpolated message template.
    pub fn message_template(&self) -> &str {
        &self.message
    }

    /// Evaluate the rule against `input`.
    ///
    /// # Errors
    ///
    /// Returns the rule's violation when the pattern does not match or the
    /// semantic predicate rejects the captures.
    pub fn evaluate(&self, input: &str, ctx: &ValidationContext) -> Result<(), ValidationError> {
        let Some(caps) = self.pattern.captures(input) else {
            return Err(self.violation(input, ctx));
        };
        match &self.check {
            Some(check) if !check(&caps, ctx) => Err(self.violation(input, ctx)),
            _ => Ok(()),
        }
    }

    fn violation(&self, input: &str, ctx: &ValidationContext) -> ValidationError {
        let gcp = ctx
            .gcp_length
            .map_or_else(|| "unset".to_string(), |g| g.to_string());
        let rule = self.message.replace("{input}", input).replace("{gcp}", &gcp);
        let input = input.to_string();
        match self.kind {
            RuleKind::Grammar => ValidationError::Grammar { input, rule },
            RuleKind::CompanyPrefix => ValidationError::CompanyPrefix { input, rule },
            RuleKind::Checksum => ValidationError::ChecksumMismatch { input, rule },
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .field("message", &self.message)
            .field("semantic", &self.check.is_some())
            .finish()
    }
}

/// The rule chain for one (type, direction, level) combination.
#[derive(Debug)]
pub struct RuleSet {
    ai_type: AiType,
    direction: Direction,
    level: Level,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Run every rule in order, stopping at the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self, input: &str, ctx: &ValidationContext) -> Result<(), ValidationError> {
        self.rules.iter().try_for_each(|rule| rule.evaluate(input, ctx))
    }

    /// The AI type this chain validates.
    pub fn ai_type(&self) -> AiType {
        self.ai_type
    }

    /// The representation this chain validates.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The level this chain validates.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

type RuleKey = (AiType, Direction, Level);

static RULE_SETS: LazyLock<HashMap<RuleKey, RuleSet>> = LazyLock::new(build_rule_sets);

/// The chain for `(ai_type, direction, level)`.
///
/// Returns `None` for the class level of a type without a pattern form.
pub fn rule_set(ai_type: AiType, direction: Direction, level: Level) -> Option<&'static RuleSet> {
    RULE_SETS.get(&(ai_type, direction, level))
}

/// What [`validate`] found out about a well-formed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Validated {
    /// AI family.
    pub ai_type: AiType,
    /// Representation.
    pub direction: Direction,
    /// Instance or class.
    pub level: Level,
}

/// Detect direction, type and level of `identifier` and run its chain.
///
/// # Errors
///
/// Returns the first violated rule, or an identification error when no
/// chain applies.
pub fn validate(identifier: &str, ctx: &ValidationContext) -> Result<Validated, ValidationError> {
    let direction =
        Direction::detect(identifier).ok_or_else(|| ValidationError::UnrecognizedIdentifier {
            input: identifier.to_string(),
        })?;
    let ai_type = classify(identifier)?;
    let level = detect_level(ai_type, direction, identifier);
    check(ai_type, direction, level, identifier, ctx)?;
    Ok(Validated {
        ai_type,
        direction,
        level,
    })
}

/// Run the chain for an already identified type, direction and level.
///
/// # Errors
///
/// Returns [`ValidationError::ClassLevelUnsupported`] when the type has no
/// class-level form, or the first violated rule.
pub fn check(
    ai_type: AiType,
    direction: Direction,
    level: Level,
    identifier: &str,
    ctx: &ValidationContext,
) -> Result<(), ValidationError> {
    let set = rule_set(ai_type, direction, level).ok_or_else(|| {
        ValidationError::ClassLevelUnsupported {
            input: identifier.to_string(),
            ai_type,
        }
    })?;
    set.validate(identifier, ctx)
}

/// Infer the level of an identified identifier.
///
/// URNs are class level exactly when they use the pattern prefix. Digital
/// Link URIs are class level when the serial marker segment is absent and
/// has no default value, or for inline serials when the payload is exactly
/// the unserialised width. A bare GLN is therefore an SGLN with extension
/// `0`, as the converter reads it. Types without a class-level form are
/// always instance level.
pub fn detect_level(ai_type: AiType, direction: Direction, identifier: &str) -> Level {
    let desc = ai_type.descriptor();
    match direction {
        Direction::Urn => match desc.pattern_prefix {
            Some(prefix) if identifier.starts_with(prefix) => Level::Class,
            _ => Level::Instance,
        },
        Direction::DigitalLink => {
            if !desc.class_level_supported() {
                return Level::Instance;
            }
            let Some(link) = DigitalLink::parse(identifier) else {
                return Level::Instance;
            };
            match desc.serial {
                SerialPlacement::Segment { ai, default: None, .. } if !link.has_key(ai) => Level::Class,
                SerialPlacement::Inline { .. } => match (desc.key.width, link.segment(desc.ai_code)) {
                    (PayloadWidth::Fixed(width), Some(value)) if value.len() == width => Level::Class,
                    _ => Level::Instance,
                },
                _ => Level::Instance,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Chain construction
// ---------------------------------------------------------------------------

fn build_rule_sets() -> HashMap<RuleKey, RuleSet> {
    let mut sets = HashMap::new();
    for desc in &DESCRIPTORS {
        for level in [Level::Instance, Level::Class] {
            let Some(prefix) = desc.prefix_for(level) else {
                continue;
            };
            sets.insert(
                (desc.ai_type, Direction::Urn, level),
                urn_rules(desc, prefix, level),
            );
            sets.insert(
                (desc.ai_type, Direction::DigitalLink, level),
                uri_rules(desc, level),
            );
        }
    }
    sets
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("rule patterns are generated from the static descriptor table")
}

fn group<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn serial_fragment(desc: &AiDescriptor) -> Option<String> {
    match desc.serial {
        SerialPlacement::None => None,
        SerialPlacement::Segment {
            charset, max_len, ..
        }
        | SerialPlacement::Inline { charset, max_len } => Some(format!(
            "(?P<serial>{}{{1,{max_len}}})",
            charset.regex_class()
        )),
    }
}

fn urn_pattern(desc: &AiDescriptor, prefix: &str, level: Level) -> String {
    let reference = match desc.key.width {
        PayloadWidth::Fixed(_) if desc.key.indicator => "[0-9]+".to_string(),
        PayloadWidth::Fixed(_) => "[0-9]*".to_string(),
        PayloadWidth::Range(..) => format!("{}+", desc.key.charset.regex_class()),
    };
    let mut pattern = format!(
        r"^{}(?P<gcp>[0-9]+)\.(?P<reference>{reference})",
        regex::escape(prefix)
    );
    for (i, width) in desc.key.counters.iter().enumerate() {
        pattern.push_str(&format!(r"\.(?P<counter{i}>[0-9]{{{width}}})"));
    }
    match (serial_fragment(desc), level) {
        (None, _) => {}
        (Some(_), Level::Class) => pattern.push_str(r"\.\*"),
        (Some(serial), Level::Instance) => {
            pattern.push_str(r"\.");
            pattern.push_str(&serial);
        }
    }
    pattern.push('$');
    pattern
}

fn uri_pattern(desc: &AiDescriptor, level: Level) -> String {
    let payload = match desc.key.width {
        PayloadWidth::Fixed(width) => format!("[0-9]{{{width}}}"),
        PayloadWidth::Range(min, max) => {
            format!("{}{{{min},{max}}}", desc.key.charset.regex_class())
        }
    };
    let mut pattern = format!(
        "{ORIGIN}{}/(?P<payload>{payload})",
        regex::escape(desc.ai_code)
    );
    if level == Level::Instance {
        if let Some(serial) = serial_fragment(desc) {
            match desc.serial {
                SerialPlacement::Segment { ai, default, .. } => {
                    let segment = format!("/{}/{serial}", regex::escape(ai));
                    if default.is_some() {
                        pattern.push_str(&format!("(?:{segment})?"));
                    } else {
                        pattern.push_str(&segment);
                    }
                }
                _ => pattern.push_str(&serial),
            }
        }
    }
    pattern.push_str(r"(?:\?[^#]*)?$");
    pattern
}

fn urn_rules(desc: &'static AiDescriptor, prefix: &str, level: Level) -> RuleSet {
    let starts = compile(&format!("^{}", regex::escape(prefix)));
    let structure = compile(&urn_pattern(desc, prefix, level));
    let (gcp_min, gcp_max) = desc.gcp_bounds;

    let mut rules = vec![
        Rule::pattern(
            RuleKind::Grammar,
            &starts,
            format!("{{input}} must start with {prefix}"),
        ),
        Rule::pattern(
            RuleKind::Grammar,
            &structure,
            format!("{{input}} must have the form {}", desc.urn_shape(level)),
        ),
        Rule::semantic(
            RuleKind::CompanyPrefix,
            &structure,
            format!("company prefix of {{input}} must be {gcp_min} to {gcp_max} digits"),
            move |caps, _| (gcp_min..=gcp_max).contains(&group(caps, "gcp").len()),
        ),
    ];

    match (desc.urn_key_digits(), desc.key.width) {
        (Some(digits), _) => rules.push(Rule::semantic(
            RuleKind::Grammar,
            &structure,
            format!(
                "company prefix and {} of {{input}} must total exactly {digits} digits",
                desc.reference_label
            ),
            move |caps, _| group(caps, "gcp").len() + group(caps, "reference").len() == digits,
        )),
        (None, PayloadWidth::Range(_, max)) => rules.push(Rule::semantic(
            RuleKind::Grammar,
            &structure,
            format!(
                "company prefix and {} of {{input}} must total at most {max} characters",
                desc.reference_label
            ),
            move |caps, _| group(caps, "gcp").len() + unit_len(group(caps, "reference")) <= max,
        )),
        (None, PayloadWidth::Fixed(_)) => {}
    }

    RuleSet {
        ai_type: desc.ai_type,
        direction: Direction::Urn,
        level,
        rules,
    }
}

fn uri_rules(desc: &'static AiDescriptor, level: Level) -> RuleSet {
    let is_uri = compile(ORIGIN);
    let has_key = compile(&format!("{ORIGIN}{}/", regex::escape(desc.ai_code)));
    let structure = compile(&uri_pattern(desc, level));
    let (gcp_min, gcp_max) = desc.gcp_bounds;

    let mut rules = vec![
        Rule::pattern(
            RuleKind::Grammar,
            &is_uri,
            "{input} must be an http(s) Digital Link URI with a host",
        ),
        Rule::pattern(
            RuleKind::Grammar,
            &has_key,
            format!("{{input}} must carry the primary key segment /{}/", desc.ai_code),
        ),
        Rule::pattern(
            RuleKind::Grammar,
            &structure,
            format!("{{input}} must have the form {}", desc.uri_shape(level)),
        ),
        Rule::semantic(
            RuleKind::CompanyPrefix,
            &structure,
            "a company prefix length is required to validate {input}",
            |_, ctx| ctx.gcp_length.is_some(),
        ),
        Rule::semantic(
            RuleKind::CompanyPrefix,
            &structure,
            format!("company prefix length {{gcp}} for {{input}} must be between {gcp_min} and {gcp_max}"),
            move |_, ctx| ctx.gcp_length.is_some_and(|g| (gcp_min..=gcp_max).contains(&g)),
        ),
    ];

    match desc.max_gcp_in_key() {
        Some(available) => rules.push(Rule::semantic(
            RuleKind::CompanyPrefix,
            &structure,
            format!(
                "company prefix length {{gcp}} exceeds the {available} company prefix digits of {{input}}"
            ),
            move |_, ctx| ctx.gcp_length.is_some_and(|g| g <= available),
        )),
        None => rules.push(Rule::semantic(
            RuleKind::CompanyPrefix,
            &structure,
            "company prefix length {gcp} must cover only digits and leave a reference in {input}",
            |caps, ctx| {
                let payload = group(caps, "payload");
                ctx.gcp_length.is_some_and(|g| {
                    payload.len() > g && payload.bytes().take(g).all(|b| b.is_ascii_digit())
                })
            },
        )),
    }

    if let Some(offset) = desc.key.check_offset {
        rules.push(Rule::semantic(
            RuleKind::Checksum,
            &structure,
            "check digit of {input} does not match the GS1 mod-10 check digit",
            move |caps, ctx| {
                !ctx.validate_check_digit || verify_check_digit_at(group(caps, "payload"), offset)
            },
        ));
    }

    RuleSet {
        ai_type: desc.ai_type,
        direction: Direction::DigitalLink,
        level,
        rules,
    }
}
