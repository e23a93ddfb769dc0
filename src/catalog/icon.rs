use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Drawing routine used by the local compositor for one tag.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Icon {
    Owl,
    Cat,
    DirtyCat,
    Skunk,
    Possum,
    Chicken,
    Squirrel,
    Vaping,
    Sleeping,
    Falling,
    Slipping,
    Laughing,
    Mischief,
    Snowboarding,
    Fishing,
    Car,
    Bar,
    Beach,
    StoreSign,
    RockConcert,
    Cigarettes,
    Hat,
    Boot,
    Mushroom,
    SpeechBubble,
    Gun,
    Wheel,
    /// Plain outlined box. Only used when configured explicitly.
    Frame,
}

/// Keyword rules, checked in order. Every phrase of a rule must match.
/// A phrase matches when its words appear consecutively in the tag and
/// each tag word starts with the corresponding phrase word.
const KEYWORD_RULES: &[(&[&str], Icon)] = &[
    (&["owl"], Icon::Owl),
    (&["dirty", "cat"], Icon::DirtyCat),
    (&["dirty", "kitten"], Icon::DirtyCat),
    (&["cat"], Icon::Cat),
    (&["kitten"], Icon::Cat),
    (&["skunk"], Icon::Skunk),
    (&["possum"], Icon::Possum),
    (&["chicken"], Icon::Chicken),
    (&["squirrel"], Icon::Squirrel),
    (&["vaping"], Icon::Vaping),
    (&["sleep"], Icon::Sleeping),
    (&["falling"], Icon::Falling),
    (&["slipping"], Icon::Slipping),
    (&["laugh"], Icon::Laughing),
    (&["mischief"], Icon::Mischief),
    (&["snowboard"], Icon::Snowboarding),
    (&["fishing"], Icon::Fishing),
    (&["car"], Icon::Car),
    (&["bar"], Icon::Bar),
    (&["beach"], Icon::Beach),
    (&["wawa"], Icon::StoreSign),
    (&["rock concert"], Icon::RockConcert),
    (&["applebee"], Icon::StoreSign),
    (&["cigarette"], Icon::Cigarettes),
    (&["hat"], Icon::Hat),
    (&["boot"], Icon::Boot),
    (&["mushroom"], Icon::Mushroom),
    (&["cranky"], Icon::SpeechBubble),
    (&["gun"], Icon::Gun),
    (&["wheel"], Icon::Wheel),
];

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn phrase_matches(tag_words: &[String], phrase: &str) -> bool {
    let phrase_words = words(phrase);
    if phrase_words.is_empty() || phrase_words.len() > tag_words.len() {
        return false;
    }
    tag_words.windows(phrase_words.len()).any(|window| {
        window
            .iter()
            .zip(&phrase_words)
            .all(|(word, wanted)| word.starts_with(wanted.as_str()))
    })
}

impl Icon {
    /// Infer the drawing routine from the tag text. Called once while the
    /// catalog is loaded; `None` means the tag needs an explicit icon.
    pub fn infer(tag: &str) -> Option<Self> {
        let tag_words = words(tag);
        KEYWORD_RULES
            .iter()
            .find(|(phrases, _)| phrases.iter().all(|p| phrase_matches(&tag_words, p)))
            .map(|(_, icon)| *icon)
    }
}
