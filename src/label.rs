use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The display label of a group.
#[derive(Debug, PartialEq, Clone, PartialOrd, Ord, Eq, Serialize)]
#[serde(transparent)]
pub struct Label(pub String);
impl From<String> for Label {
    fn from(x: String) -> Label {
        Label(x)
    }
}
impl From<&str> for Label {
    fn from(x: &str) -> Label {
        Label(x.to_string())
    }
}
impl FromStr for Label {
    type Err = ();
    fn from_str(x: &str) -> Result<Label, ()> {
        Ok(Label::from(x))
    }
}
impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Label {
    /// Width in characters
    pub fn width(&self) -> usize {
        self.0.chars().count()
    }

    /// The label with trailing spaces up to `width` characters
    pub fn padded(&self, width: usize) -> Label {
        Label(format!("{:<width$}", self.0, width = width))
    }
}

/// Pad every label to the width of the widest one.
pub fn equal_width<I>(labels: I) -> Vec<Label>
where
    I: IntoIterator,
    I::Item: Into<Label>,
{
    let labels = labels.into_iter().map(Into::into).collect::<Vec<Label>>();
    let width = labels.iter().map(Label::width).max().unwrap_or(0);
    labels.iter().map(|l| l.padded(width)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_widest() {
        let labels = equal_width(["male", "female"]);
        assert_eq!(labels, vec![Label::from("male  "), Label::from("female")]);
    }

    #[test]
    fn counts_chars_not_bytes() {
        let labels = equal_width(["größe", "height"]);
        assert_eq!(labels[0].0, "größe ");
        assert_eq!(labels[0].width(), labels[1].width());
    }

    #[test]
    fn single_label_unchanged() {
        assert_eq!(equal_width(["x and y"]), vec![Label::from("x and y")]);
        assert!(equal_width(Vec::<String>::new()).is_empty());
    }
}
