mod invalid_json;
mod notebooks;
mod reminders;
mod users;
