//! Format helpers for strings with interpolation.

use super::t;
use nudge_core::user::UserRecord;
use nudge_core::weather::WeatherSummary;

/// Grammatical number of a count, following Russian agreement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralForm {
    /// 1, 21, 101 ... ("год")
    One,
    /// 2-4, 22-24 ... ("года")
    Few,
    /// 0, 5-20, 25-30 ... ("лет")
    Many,
}

/// Classify `n`: the last two digits 10..=20 are always `Many`, otherwise
/// the last digit decides.
///
/// Remainders are Euclidean, so negative numbers classify by their
/// non-negative residue.
pub fn plural_form(n: i64) -> PluralForm {
    let m = n.rem_euclid(100);
    if (10..=20).contains(&m) {
        return PluralForm::Many;
    }
    match n.rem_euclid(10) {
        1 => PluralForm::One,
        2..=4 => PluralForm::Few,
        _ => PluralForm::Many,
    }
}

/// The word for "years" agreeing with `age`.
pub fn age_unit(lang: &str, age: i64) -> &'static str {
    match (lang, plural_form(age)) {
        ("English", PluralForm::One) => "year",
        ("English", _) => "years",
        (_, PluralForm::One) => "год",
        (_, PluralForm::Few) => "года",
        (_, PluralForm::Many) => "лет",
    }
}

/// Final message of the registration flow.
pub fn greeting(lang: &str, name: &str, age: i64) -> String {
    let unit = age_unit(lang, age);
    match lang {
        "English" => format!("Nice to meet you, {name}!\nYou are {age} {unit} old."),
        _ => format!("Приятно познакомиться, {name}!\nТебе {age} {unit}."),
    }
}

/// Description for a forecast weather code.
pub fn weather_description(lang: &str, code: Option<i64>) -> &'static str {
    let english = lang == "English";
    match (code, english) {
        (Some(0), true) => "Clear",
        (Some(0), false) => "Ясно",
        (Some(1), true) => "Few clouds",
        (Some(1), false) => "Маленькие облака",
        (Some(2), true) => "Cloudy",
        (Some(2), false) => "Облачно",
        (Some(3), true) => "Rain",
        (Some(3), false) => "Дождь",
        (Some(4), true) => "Snow",
        (Some(4), false) => "Снег",
        (Some(5), true) => "Thunderstorm",
        (Some(5), false) => "Гроза",
        (Some(6), true) => "Fog",
        (Some(6), false) => "Туман",
        (Some(7), true) => "Rain and snow",
        (Some(7), false) => "Дождь со снегом",
        (Some(8), true) => "Snow and rain",
        (Some(8), false) => "Снег с дождем",
        (_, true) => "Unknown",
        (_, false) => "Неизвестно",
    }
}

/// Multi-line weather report for a city.
pub fn weather_report(lang: &str, city: &str, w: &WeatherSummary) -> String {
    let humidity = w
        .humidity
        .map(|h| h.to_string())
        .unwrap_or_else(|| t("unknown", lang).to_string());
    let description = weather_description(lang, w.weather_code);
    match lang {
        "English" => format!(
            "Weather in {city}:\nTemperature: {}°C\nWind speed: {} m/s\nHumidity: {humidity}%\nConditions: {description}",
            w.temperature, w.windspeed
        ),
        _ => format!(
            "Погода в городе {city}:\nТемпература: {}°C\nСкорость ветра: {} м/с\nВлажность: {humidity}%\nСостояние погоды: {description}",
            w.temperature, w.windspeed
        ),
    }
}

/// Listing for `/users`.
pub fn users_list(lang: &str, users: &[UserRecord]) -> String {
    if users.is_empty() {
        return t("no_users", lang).to_string();
    }
    let mut out = format!("{}\n\n", t("users_header", lang));
    for u in users {
        let line = match lang {
            "English" => format!("ID: {}, Name: {}, Age: {}\n", u.id, u.name, u.age),
            _ => format!("ID: {}, Имя: {}, Возраст: {}\n", u.id, u.name, u.age),
        };
        out.push_str(&line);
    }
    out
}

/// Reply to a photo with its pixel dimensions.
pub fn image_size(lang: &str, width: u32, height: u32) -> String {
    match lang {
        "English" => format!("Image size: {width}x{height} pixels."),
        _ => format!("Размер изображения: {width}x{height} пикселей."),
    }
}

/// Label of menu option `n`.
pub fn choice_label(lang: &str, n: u8) -> String {
    match lang {
        "English" => format!("Option {n}"),
        _ => format!("Выбор {n}"),
    }
}

/// Confirmation after pressing menu option `n`.
pub fn choice_made(lang: &str, n: u8) -> String {
    let label = choice_label(lang, n);
    match lang {
        "English" => format!("You chose {label}"),
        _ => format!("Вы выбрали {label}"),
    }
}
