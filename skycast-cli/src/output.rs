//! Terminal rendering of store contents.

use skycast_core::provider::openweather::icon_url;
use skycast_core::{AppStore, CurrentWeather, ForecastEntry, SavedCity, Units, daily_digest, tips};

pub fn print_current(current: &CurrentWeather, units: Units) {
    let place = if current.country_code.is_empty() {
        current.location_name.clone()
    } else {
        format!("{}, {}", current.location_name, current.country_code)
    };

    println!("Weather in {place}");
    println!(
        "  {} ({})",
        capitalize(&current.condition_description),
        current.condition_main
    );
    println!(
        "  Temperature: {:.1}{} (feels like {:.1}{})",
        current.temperature,
        units.temperature_suffix(),
        current.feels_like,
        units.temperature_suffix()
    );
    println!("  Humidity:    {}%", current.humidity_pct);
    println!("  Pressure:    {} hPa", current.pressure_hpa);
    println!("  Wind:        {:.1} {}", current.wind_speed, units.wind_speed_suffix());
    println!("  Observed:    {}", current.observed_at.format("%a %d %b %H:%M UTC"));
    if !current.icon_code.is_empty() {
        println!("  Icon:        {}", icon_url(&current.icon_code));
    }
}

/// One line per day, downsampled from the 3-hourly forecast.
pub fn print_forecast_digest(forecast: &[ForecastEntry], units: Units) {
    let digest = daily_digest(forecast);
    if digest.is_empty() {
        return;
    }

    println!("5-day outlook:");
    for entry in digest {
        println!(
            "  {}  {:>6.1}{}  {}",
            entry.forecast_at.format("%a %d %b %H:%M"),
            entry.temperature,
            units.temperature_suffix(),
            capitalize(&entry.condition_description),
        );
    }
}

pub fn print_advice(condition_main: &str) {
    let advice = tips::advice_for(condition_main);
    println!("Tip: {}", advice.tip);
    println!("Suggested: {}", advice.activities.join(", "));
}

pub fn print_saved_cities(cities: &[SavedCity], units: Units) {
    if cities.is_empty() {
        println!("No saved cities yet. Save one with `skycast save <city>`.");
        return;
    }

    println!("Saved cities:");
    for city in cities {
        println!(
            "  {} ({})  {:.1}{}  {}",
            city.name,
            city.country_code,
            city.temperature,
            units.temperature_suffix(),
            city.condition_main,
        );
    }
}

/// Full post-query rendering: current conditions, outlook, advice.
pub fn print_query_result(store: &AppStore) {
    let Some(current) = &store.current_weather else {
        println!("No weather data available.");
        return;
    };

    print_current(current, store.units);
    println!();
    print_forecast_digest(&store.forecast, store.units);
    println!();
    print_advice(&current.condition_main);
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("overcast clouds"), "Overcast clouds");
        assert_eq!(capitalize("überwiegend bewölkt"), "Überwiegend bewölkt");
    }
}
