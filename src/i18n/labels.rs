//! Static reply texts.

/// Look up `key`; languages other than English get the Russian text.
pub(super) fn lookup(key: &str, lang: &str) -> Option<&'static str> {
    let text = match key {
        // --- Registration flow ---
        "ask_name" => match lang {
            "English" => "Hi! What's your name?",
            _ => "Привет! Как тебя зовут?",
        },
        "ask_age" => match lang {
            "English" => "How old are you?",
            _ => "Сколько тебе лет?",
        },
        "age_not_numeric" => match lang {
            "English" => "Please enter a numeric value for your age.",
            _ => "Пожалуйста, введи числовое значение для возраста.",
        },
        "forgot_to_reply" => match lang {
            "English" => "You forgot to reply",
            _ => "Вы забыли ответить",
        },

        // --- Weather flow ---
        "ask_city" => match lang {
            "English" => "Please enter a city name:",
            _ => "Пожалуйста, введите название города:",
        },
        "city_not_found" => match lang {
            "English" => "Could not find the city. Please try again.",
            _ => "Не удалось найти город. Попробуйте еще раз.",
        },
        "weather_unavailable" => match lang {
            "English" => "Could not get weather data. Please try later.",
            _ => "Не удалось получить данные о погоде. Попробуйте позже.",
        },
        "lookup_failed" => match lang {
            "English" => "An error occurred while fetching data. Please try later.",
            _ => "Произошла ошибка при получении данных. Попробуйте позже.",
        },
        "lookup_malformed" => match lang {
            "English" => "Could not process the server response. Please try again.",
            _ => "Не удалось обработать ответ сервера. Попробуйте еще раз.",
        },
        "unknown" => match lang {
            "English" => "unknown",
            _ => "неизвестно",
        },

        // --- Stateless commands ---
        "help" => match lang {
            "English" => "Available commands: /start, /help, /echo, /photo, /menu, /users, /weather",
            _ => "Доступные команды: /start, /help, /echo, /photo, /menu, /users, /weather",
        },
        "echo_empty" => match lang {
            "English" => "You did not enter a message to echo.",
            _ => "Вы не ввели сообщение для эхо.",
        },
        "menu_prompt" => match lang {
            "English" => "Make a choice:",
            _ => "Сделайте выбор:",
        },
        "no_users" => match lang {
            "English" => "No registered users.",
            _ => "Нет зарегистрированных пользователей.",
        },
        "users_header" => match lang {
            "English" => "Registered users:",
            _ => "Зарегистрированные пользователи:",
        },
        "users_error" => match lang {
            "English" => "An error occurred while fetching the user list.",
            _ => "Произошла ошибка при получении списка пользователей.",
        },
        "image_fetch_failed" => match lang {
            "English" => "An error occurred while fetching the image. Please try again.",
            _ => "Произошла ошибка при получении изображения. Попробуйте еще раз.",
        },
        "image_probe_failed" => match lang {
            "English" => "An error occurred while processing the image. Please try again.",
            _ => "Произошла ошибка при обработке изображения. Попробуйте еще раз.",
        },
        "generic_error" => match lang {
            "English" => "An error occurred, please try later.",
            _ => "Произошла ошибка, попробуйте позже.",
        },

        // --- Daily job ---
        "daily_notification" => match lang {
            "English" => "Don't forget to check your notifications!",
            _ => "Не забудьте проверить уведомления!",
        },
        _ => return None,
    };
    Some(text)
}
