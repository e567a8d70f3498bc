use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc, Weekday};

/// Parses the human date forms accepted for due dates: reserved keywords
/// (`today`, `tomorrow`, `eow`), relative offsets (`+3d`, `+2w`), weekday
/// tokens (`fri`, `2:fri`) and the standard `%Y-%m-%d [%H:%M:%S]` formats.
/// Date-only inputs resolve to the end of that local day.
pub fn parse_human_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let now = Local::now();
    let today = now.date_naive();

    match input.to_lowercase().as_str() {
        "today" | "tod" => return end_of_day(today),
        "tomorrow" | "tom" => return end_of_day(today + Duration::days(1)),
        "eow" => {
            // End of week (Sunday)
            let days_to_sunday = Weekday::Sun.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            let target = if days_to_sunday >= 0 {
                today + Duration::days(days_to_sunday)
            } else {
                today + Duration::days(days_to_sunday + 7)
            };
            return end_of_day(target);
        }
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('+') {
        if rest.len() < 2 {
            return Err(anyhow!("Invalid relative format: {}", input));
        }
        let (num_str, unit) = rest.split_at(rest.len() - 1);
        let count: i64 = num_str
            .parse()
            .map_err(|_| anyhow!("Invalid relative format: {}", input))?;
        let target = match unit {
            "d" => today + Duration::days(count),
            "w" => today + Duration::weeks(count),
            _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
        };
        return end_of_day(target);
    }

    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_needed = target_weekday.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // count = 1 means the next such weekday, count = 2 the one after.
            days_needed += (count - 1) * 7;
            return end_of_day(today + Duration::days(days_needed));
        }
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Local
            .from_local_datetime(&dt)
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| anyhow!("Ambiguous local time: {}", input));
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return end_of_day(d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    let local_dt = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| anyhow!("Invalid date: {}", date))?;
    Local
        .from_local_datetime(&local_dt)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Ambiguous local time for {}", date))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().map(|count| (count, day)),
        // Just "fri" means 1:fri
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
