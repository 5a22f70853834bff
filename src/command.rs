// Commands typed into the interactive shell
use crate::utils::parse_date;
use chrono::NaiveDate;

pub const HELP_TEXT: &str = "Available commands:\n\
    <start> <end>  analyze a new date range (YYYY-MM-DD YYYY-MM-DD)\n\
    start <date>   change the start date\n\
    end <date>     change the end date\n\
    refresh        re-run the current range\n\
    help           command list\n\
    quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Range(NaiveDate, NaiveDate),
    Start(NaiveDate),
    End(NaiveDate),
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

/// Parses one input line. Blank lines count as `Refresh`.
pub fn parse_command(line: &str) -> Command {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] | ["refresh"] | ["r"] => Command::Refresh,
        ["help"] | ["h"] | ["?"] => Command::Help,
        ["quit"] | ["exit"] | ["q"] => Command::Quit,
        ["start", date] => parse_date(date).map_or_else(|| unknown(line), Command::Start),
        ["end", date] => parse_date(date).map_or_else(|| unknown(line), Command::End),
        [start, end] => match (parse_date(start), parse_date(end)) {
            (Some(s), Some(e)) => Command::Range(s, e),
            _ => unknown(line),
        },
        _ => unknown(line),
    }
}

fn unknown(line: &str) -> Command {
    Command::Unknown(line.trim().to_string())
}
