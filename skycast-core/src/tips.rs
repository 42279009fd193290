//! Per-condition advice shown after a successful query, keyed by the
//! provider's `weather[0].main` group.

/// A one-line tip plus activity suggestions for a condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
    pub tip: &'static str,
    pub activities: &'static [&'static str],
}

const FALLBACK: Advice = Advice {
    tip: "Enjoy your day!",
    activities: &["General activities", "Outdoor fun", "Indoor relaxation", "Social time"],
};

/// Advice for a provider condition group. Unknown groups get a generic
/// fallback rather than an error.
pub fn advice_for(condition_main: &str) -> Advice {
    match condition_main {
        "Clear" => Advice {
            tip: "It's a sunny day! Don't forget your sunscreen.",
            activities: &["Outdoor activities", "Picnic", "Hiking", "Beach day"],
        },
        "Rain" => Advice {
            tip: "Carry an umbrella. It looks like rain today!",
            activities: &["Indoor activities", "Reading", "Movie day", "Board games"],
        },
        "Clouds" => Advice {
            tip: "Cloudy skies ahead. Enjoy the shade!",
            activities: &["Light outdoor activities", "Photography", "Walking", "Gardening"],
        },
        "Snow" => Advice {
            tip: "Dress warmly, snow is on the way!",
            activities: &["Snow activities", "Skiing", "Snowman building", "Hot chocolate"],
        },
        "Thunderstorm" => Advice {
            tip: "Stay indoors during thunderstorms for safety.",
            activities: &["Indoor activities", "Cooking", "Puzzles", "Music"],
        },
        "Drizzle" => Advice {
            tip: "Light rain expected. A light jacket should do!",
            activities: &["Indoor activities", "Coffee shop visit", "Shopping", "Art"],
        },
        "Mist" | "Fog" => Advice {
            tip: "Foggy conditions. Drive carefully!",
            activities: &["Indoor activities", "Yoga", "Meditation", "Reading"],
        },
        "Smoke" | "Ash" => Advice {
            tip: "Poor air quality. Consider staying indoors.",
            activities: &["Indoor activities", "Air purifier on", "Light exercise", "Rest"],
        },
        "Haze" => Advice {
            tip: "Hazy conditions. Limit outdoor activities.",
            activities: &["Indoor activities", "Air purifier on", "Light exercise", "Rest"],
        },
        "Dust" | "Sand" => Advice {
            tip: "Dusty conditions. Consider wearing a mask.",
            activities: &["Indoor activities", "Cleaning", "Indoor exercise", "Rest"],
        },
        "Squall" => Advice {
            tip: "Strong winds expected. Secure loose objects!",
            activities: &["Indoor activities", "Secure outdoor items", "Indoor exercise", "Rest"],
        },
        "Tornado" => Advice {
            tip: "Tornado warning! Seek shelter immediately.",
            activities: &["Emergency shelter", "Stay informed", "Emergency prep", "Safety first"],
        },
        _ => FALLBACK,
    }
}
