//! 用户意图解析
//!
//! 把一行终端输入翻译成状态机能理解的操作。数字在配置界面表示难度，
//! 在答题界面表示选项

use crate::models::{AssessmentPhase, Difficulty, OPTION_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// 选择难度（配置界面）
    ChooseDifficulty(Difficulty),
    /// 开始测评，未指定时使用已选难度
    Start(Option<Difficulty>),
    /// 为当前题目选择选项（0-based）
    Select(usize),
    Next,
    Prev,
    /// 跳到指定题目（0-based）
    Jump(usize),
    Submit,
    Retry,
    Help,
    Quit,
    Unknown(String),
}

impl Intent {
    pub fn parse(line: &str, phase: AssessmentPhase) -> Self {
        let line = line.trim();
        let mut parts = line.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match command.as_str() {
            "" => Intent::Unknown(String::new()),
            "start" | "s" => match arg {
                None => Intent::Start(None),
                Some(a) => Difficulty::from_str(a)
                    .map(|d| Intent::Start(Some(d)))
                    .unwrap_or_else(|| Intent::Unknown(line.to_string())),
            },
            "level" | "l" => arg
                .and_then(Difficulty::from_str)
                .map(Intent::ChooseDifficulty)
                .unwrap_or_else(|| Intent::Unknown(line.to_string())),
            "next" | "n" => Intent::Next,
            "prev" | "p" => Intent::Prev,
            "goto" | "g" => arg
                .and_then(|a| a.parse::<usize>().ok())
                .filter(|k| *k >= 1)
                .map(|k| Intent::Jump(k - 1))
                .unwrap_or_else(|| Intent::Unknown(line.to_string())),
            "submit" => Intent::Submit,
            "retry" | "home" | "r" => Intent::Retry,
            "help" | "h" | "?" => Intent::Help,
            "quit" | "q" | "exit" => Intent::Quit,
            _ => Self::parse_choice(&command, phase).unwrap_or_else(|| Intent::Unknown(line.to_string())),
        }
    }

    /// 单个数字或字母：配置界面选难度，答题界面选选项
    fn parse_choice(command: &str, phase: AssessmentPhase) -> Option<Self> {
        match phase {
            AssessmentPhase::Idle => Difficulty::from_str(command).map(Intent::ChooseDifficulty),
            AssessmentPhase::InProgress => option_index(command).map(Intent::Select),
            _ => None,
        }
    }
}

/// "1"–"4" 或 "a"–"d" 转为选项索引
fn option_index(token: &str) -> Option<usize> {
    let mut chars = token.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let index = match c {
        '1'..='9' => c as usize - '1' as usize,
        'a'..='z' => c as usize - 'a' as usize,
        _ => return None,
    };
    (index < OPTION_COUNT).then_some(index)
}

/// 选项序号对应的字母
pub fn option_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

pub const HELP_TEXT: &str = "\
Commands:
  1-3 / level <name>   choose difficulty (configuration screen)
  start [difficulty]   generate the assessment
  1-4 / a-d            select an option (question screen)
  n / next, p / prev   navigate questions
  g <k>                jump to question k
  submit               submit your answers
  retry / home         return to the configuration screen
  help, quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_depend_on_phase() {
        assert_eq!(
            Intent::parse("2", AssessmentPhase::Idle),
            Intent::ChooseDifficulty(Difficulty::Mid)
        );
        assert_eq!(Intent::parse("2", AssessmentPhase::InProgress), Intent::Select(1));
        assert_eq!(Intent::parse("c", AssessmentPhase::InProgress), Intent::Select(2));
        assert!(matches!(
            Intent::parse("5", AssessmentPhase::InProgress),
            Intent::Unknown(_)
        ));
    }

    #[test]
    fn test_start_with_difficulty() {
        assert_eq!(
            Intent::parse("start senior", AssessmentPhase::Idle),
            Intent::Start(Some(Difficulty::Senior))
        );
        assert_eq!(Intent::parse("  START ", AssessmentPhase::Idle), Intent::Start(None));
        assert!(matches!(
            Intent::parse("start wizard", AssessmentPhase::Idle),
            Intent::Unknown(_)
        ));
    }

    #[test]
    fn test_navigation_commands() {
        assert_eq!(Intent::parse("n", AssessmentPhase::InProgress), Intent::Next);
        assert_eq!(Intent::parse("prev", AssessmentPhase::InProgress), Intent::Prev);
        assert_eq!(Intent::parse("g 3", AssessmentPhase::InProgress), Intent::Jump(2));
        assert!(matches!(
            Intent::parse("g 0", AssessmentPhase::InProgress),
            Intent::Unknown(_)
        ));
        assert_eq!(Intent::parse("home", AssessmentPhase::Completed), Intent::Retry);
    }

    #[test]
    fn test_option_letter() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }
}
