//! 界面渲染
//!
//! 纯函数：只读状态机，每个阶段对应一个界面

use std::fmt::Write;

use crate::models::{AnswerMap, Difficulty, Question};
use crate::orchestrator::intent::option_letter;
use crate::services::ScoreReport;
use crate::workflow::{Assessment, Phase, SubmitPolicy};

const WIDTH: usize = 60;

/// 渲染当前阶段的完整界面（含页头）
pub fn render(assessment: &Assessment, selected: Difficulty) -> String {
    let mut out = header(assessment);
    let body = match assessment.state() {
        Phase::Idle => configuration_screen(selected, false),
        Phase::Loading { difficulty } => configuration_screen(*difficulty, true),
        Phase::InProgress { .. } => question_screen(assessment),
        Phase::Completed {
            questions, answers, ..
        } => match assessment.report() {
            Some(report) => results_screen(questions, answers, &report),
            None => String::new(),
        },
        Phase::Error { reason } => error_screen(reason),
    };
    out.push_str(&body);
    out
}

fn header(assessment: &Assessment) -> String {
    let status = if matches!(assessment.state(), Phase::InProgress { .. }) {
        "Simulation Active".to_string()
    } else {
        format!("v{}", env!("CARGO_PKG_VERSION"))
    };
    let title = "TechPrep";
    let gap = WIDTH.saturating_sub(title.len() + status.len()).max(1);
    format!("{}{}{}\n{}\n", title, " ".repeat(gap), status, "=".repeat(WIDTH))
}

/// 配置界面（Idle / Loading）
pub fn configuration_screen(selected: Difficulty, generating: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Technical Interview Simulator");
    let _ = writeln!(
        out,
        "Practice with AI-generated multiple-choice questions tailored to your level.\n"
    );
    let _ = writeln!(out, "Configure Assessment");
    let _ = writeln!(out, "Select Difficulty Level:");
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let marker = if *difficulty == selected { "(*)" } else { "( )" };
        let _ = writeln!(out, "  {} {}. {}", marker, i + 1, difficulty);
    }
    out.push('\n');
    if generating {
        let _ = writeln!(out, "Generating Assessment...");
    } else {
        let _ = writeln!(out, "> type `start` to begin, 1-3 to change difficulty");
    }
    out
}

/// 答题界面
pub fn question_screen(assessment: &Assessment) -> String {
    let (Some(question), Some(progress), Some(collector)) = (
        assessment.current_question(),
        assessment.progress(),
        assessment.collector(),
    ) else {
        return String::new();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Question {} of {}    {}% Completed",
        progress.current, progress.total, progress.percent
    );
    let filled = WIDTH * progress.percent as usize / 100;
    let _ = writeln!(out, "[{}{}]\n", "#".repeat(filled), "-".repeat(WIDTH - filled));

    let _ = writeln!(out, "<{}>", question.topic);
    let _ = writeln!(out, "{}\n", question.question_text);

    let selected = collector.answers().get(&question.id);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(i) { "(*)" } else { "( )" };
        let _ = writeln!(out, "  {} {}. {}", marker, option_letter(i), option);
    }
    out.push('\n');

    let mut actions = Vec::new();
    if !collector.is_first() {
        actions.push("p: Previous".to_string());
    }
    if collector.is_last() {
        if collector.can_submit() {
            actions.push("submit: Submit".to_string());
        } else {
            actions.push(format!(
                "submit: disabled ({}/{} answered)",
                progress.answered, progress.total
            ));
        }
    } else {
        actions.push("n: Next".to_string());
    }
    if collector.policy() == SubmitPolicy::Lenient && !collector.is_last() {
        actions.push("submit: Submit early".to_string());
    }
    let _ = writeln!(out, "{}", actions.join("   "));
    out
}

/// 成绩界面
pub fn results_screen(questions: &[Question], answers: &AnswerMap, report: &ScoreReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Assessment Complete\n");
    let _ = writeln!(
        out,
        "Score: {}/{}    {}%    {}",
        report.correct_count,
        report.total_count,
        report.percentage,
        report.grade()
    );
    if report.skipped_count() > 0 {
        let _ = writeln!(out, "Skipped: {}", report.skipped_count());
    }
    let _ = writeln!(out, "\n{}", "-".repeat(WIDTH));
    let _ = writeln!(out, "Detailed Analysis\n");

    for (i, (question, result)) in questions.iter().zip(&report.results).enumerate() {
        let mark = if result.is_correct { "✓" } else { "✗" };
        let _ = writeln!(out, "{} {}. [{}] {}", mark, i + 1, question.topic, question.question_text);
        for (opt_idx, option) in question.options.iter().enumerate() {
            let note = if opt_idx == question.correct_index {
                "  <- correct answer"
            } else if answers.get(&question.id) == Some(opt_idx) {
                "  <- your answer"
            } else {
                ""
            };
            let _ = writeln!(out, "     {}. {}{}", option_letter(opt_idx), option, note);
        }
        if result.is_skipped {
            let _ = writeln!(out, "     ⚠️ Question skipped");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "> type `retry` to take another assessment");
    out
}

/// 错误界面，只提供返回首页
pub fn error_screen(reason: &str) -> String {
    format!(
        "System Error\nFailed to initialize the simulation environment.\n({})\n\n> type `home` to return\n",
        reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fallback_questions;

    fn in_progress(policy: SubmitPolicy) -> Assessment {
        let mut a = Assessment::new(policy);
        a.begin(Difficulty::Junior);
        a.finish_loading(fallback_questions());
        a
    }

    #[test]
    fn test_idle_screen_marks_selected_difficulty() {
        let screen = render(&Assessment::default(), Difficulty::Senior);
        assert!(screen.contains("(*) 3. Senior"));
        assert!(screen.contains("( ) 2. Mid-Level"));
        assert!(!screen.contains("Simulation Active"));
    }

    #[test]
    fn test_loading_screen() {
        let mut a = Assessment::default();
        a.begin(Difficulty::Mid);
        let screen = render(&a, Difficulty::Junior);
        assert!(screen.contains("Generating Assessment..."));
        assert!(screen.contains("(*) 2. Mid-Level"));
    }

    #[test]
    fn test_question_screen_progress_and_selection() {
        let mut a = in_progress(SubmitPolicy::Strict);
        a.select(1).unwrap();
        let screen = render(&a, Difficulty::Junior);
        assert!(screen.contains("Simulation Active"));
        assert!(screen.contains("Question 1 of 3    33% Completed"));
        assert!(screen.contains("(*) B. O(log n)"));
        assert!(screen.contains("n: Next"));
        assert!(!screen.contains("p: Previous"));
    }

    #[test]
    fn test_submit_disabled_until_all_answered() {
        let mut a = in_progress(SubmitPolicy::Strict);
        a.jump(2).unwrap();
        a.select(0).unwrap();
        assert!(question_screen(&a).contains("submit: disabled (1/3 answered)"));
    }

    #[test]
    fn test_results_screen_shows_grade_and_skips() {
        let mut a = in_progress(SubmitPolicy::Lenient);
        a.select(1).unwrap();
        a.submit().unwrap();

        let screen = render(&a, Difficulty::Junior);
        assert!(screen.contains("Score: 1/3    33%    Needs Improvement"));
        assert!(screen.contains("Skipped: 2"));
        assert_eq!(screen.matches("Question skipped").count(), 2);
    }

    #[test]
    fn test_error_screen() {
        let mut a = Assessment::default();
        a.begin(Difficulty::Mid);
        a.fail_loading("boom");
        let screen = render(&a, Difficulty::Mid);
        assert!(screen.contains("System Error"));
        assert!(screen.contains("home"));
    }
}
