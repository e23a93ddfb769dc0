//! Built-in tag catalog used when the config file does not declare one.

pub const ACTORS: &[&str] = &[
    "a wise old owl",
    "a grumpy cat",
    "a dirty alley cat",
    "a nervous skunk",
    "a sleepy possum",
    "a runaway chicken",
    "a caffeinated squirrel",
    "a tiny kitten",
];

pub const ACTIVITIES: &[&str] = &[
    "vaping behind the dumpster",
    "sleeping on the job",
    "falling down the stairs",
    "slipping on a banana peel",
    "laughing uncontrollably",
    "getting into mischief",
    "snowboarding badly",
    "fishing for compliments",
];

pub const AREAS: &[&str] = &[
    "in a beat-up car",
    "at a dive bar",
    "on a windy beach",
    "outside a Wawa",
    "at a rock concert",
    "inside an Applebee's",
];

pub const ACCESSORIES: &[&str] = &[
    "a pack of cigarettes",
    "a ridiculous hat",
    "one muddy boot",
    "a suspicious mushroom",
    "a cranky lady yelling",
    "a water gun",
    "a spare wheel",
];

/// Category name and tags, in draw order.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("actors", ACTORS),
    ("activities", ACTIVITIES),
    ("areas", AREAS),
    ("accessories", ACCESSORIES),
];
