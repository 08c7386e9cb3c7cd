//! Semantic version triple and bump rules.
//!
//! A version is always exactly three dot-separated non-negative integers.
//! Anything else is rejected with [`VersionFormatError`] before a caller gets a
//! chance to touch the filesystem. Components keep their decimal text as
//! given, so a parsed version formats back to the exact input and bumps never
//! overflow.
use clap::ValueEnum;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One version component: a non-empty run of ASCII digits, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    digits: String,
}

impl Component {
    pub fn zero() -> Self {
        Self {
            digits: "0".to_string(),
        }
    }

    fn from_digits(digits: &str) -> Self {
        Self {
            digits: digits.to_string(),
        }
    }

    /// The text exactly as parsed (`007` stays `007`).
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// The integer value in decimal without leading zeros (`007` -> `7`).
    pub fn value(&self) -> &str {
        let trimmed = self.digits.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }

    /// The value plus one, carried digit by digit.
    pub fn incremented(&self) -> Self {
        let mut digits: Vec<u8> = self.value().bytes().collect();
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
        Self {
            digits: digits.into_iter().map(char::from).collect(),
        }
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.value(), other.value());
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// `major.minor.patch` with no prefix, suffix, or surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: Component,
    pub minor: Component,
    pub patch: Component,
}

/// Which component a bump increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl BumpKind {
    pub const ALL: [BumpKind; 3] = [BumpKind::Major, BumpKind::Minor, BumpKind::Patch];

    pub fn as_str(&self) -> &'static str {
        match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFormatError {
    input: String,
}

impl VersionFormatError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for VersionFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version format: {}", self.input)
    }
}

impl std::error::Error for VersionFormatError {}

/// True when any cause in the chain is a rejected version string.
pub fn is_format_error(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<VersionFormatError>().is_some())
}

impl Version {
    pub fn zero() -> Self {
        Self {
            major: Component::zero(),
            minor: Component::zero(),
            patch: Component::zero(),
        }
    }

    /// Next version for `kind`; lower components reset to zero.
    pub fn bump(&self, kind: BumpKind) -> Version {
        match kind {
            BumpKind::Major => Version {
                major: self.major.incremented(),
                minor: Component::zero(),
                patch: Component::zero(),
            },
            BumpKind::Minor => Version {
                major: self.major.clone(),
                minor: self.minor.incremented(),
                patch: Component::zero(),
            },
            BumpKind::Patch => Version {
                major: self.major.clone(),
                minor: self.minor.clone(),
                patch: self.patch.incremented(),
            },
        }
    }
}

impl FromStr for Version {
    type Err = VersionFormatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let pattern = Regex::new(r"\A([0-9]+)\.([0-9]+)\.([0-9]+)\z")
            .expect("regex for version triple");
        let caps = pattern.captures(input).ok_or_else(|| VersionFormatError {
            input: input.to_string(),
        })?;
        Ok(Version {
            major: Component::from_digits(&caps[1]),
            minor: Component::from_digits(&caps[2]),
            patch: Component::from_digits(&caps[3]),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
