//! 计算题的 `server.py` 生成
//!
//! PrairieLearn 在每次出题时调用 `generate(data)`，这里按 Canvas 的变量定义
//! 随机取值，再依次执行公式。

use crate::models::{FormulaRecord, VariableRecord};
use std::fmt::Write;

/// 取最后一条公式等号左边的变量名，作为答案名
pub fn answer_name(formulas: &[FormulaRecord]) -> Option<String> {
    let last = formulas.last()?;
    let lhs = last.formula.split('=').next()?.trim();
    (!lhs.is_empty()).then(|| lhs.to_string())
}

/// 带小数位的变量：整数范围与除数
///
/// `10^scale` 超出 i64 时改用浮点计算，输出仍是不带小数点的整数。
fn scaled_bounds(variable: &VariableRecord) -> (String, String, String) {
    match 10_i64.checked_pow(variable.scale) {
        Some(multiplier) => (
            ((variable.min * multiplier as f64).round() as i64).to_string(),
            ((variable.max * multiplier as f64).round() as i64).to_string(),
            multiplier.to_string(),
        ),
        None => {
            let multiplier = 10f64.powi(variable.scale.min(i32::MAX as u32) as i32);
            (
                (variable.min * multiplier).round().to_string(),
                (variable.max * multiplier).round().to_string(),
                multiplier.to_string(),
            )
        }
    }
}

/// 生成 server.py 源码
///
/// # 参数
/// - `variables`: 变量定义（带 scale 的变量生成小数）
/// - `formulas`: 公式，按声明顺序执行
/// - `answer`: 最后一条公式左边的变量名
pub fn server_script(variables: &[VariableRecord], formulas: &[FormulaRecord], answer: &str) -> String {
    let mut script = String::from("import random\n\ndef generate(data):\n");

    for variable in variables {
        if variable.scale == 0 {
            let _ = writeln!(
                script,
                "    {} = random.randint({}, {})",
                variable.name, variable.min as i64, variable.max as i64
            );
        } else {
            let (min, max, divisor) = scaled_bounds(variable);
            let _ = writeln!(
                script,
                "    {} = random.randint({}, {}) / {}",
                variable.name, min, max, divisor
            );
        }
    }

    for formula in formulas {
        let _ = writeln!(script, "    {}", formula.formula.trim());
    }

    for variable in variables {
        let _ = writeln!(
            script,
            "    data[\"params\"][\"{0}\"] = {0}",
            variable.name
        );
    }
    let _ = writeln!(script, "    data[\"correct_answers\"][\"{0}\"] = {0}", answer);

    script
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str, min: f64, max: f64, scale: u32) -> VariableRecord {
        VariableRecord {
            name: name.to_string(),
            min,
            max,
            scale,
        }
    }

    fn formula(text: &str) -> FormulaRecord {
        FormulaRecord {
            formula: text.to_string(),
        }
    }

    #[test]
    fn test_answer_name_from_last_formula() {
        let formulas = vec![formula("s = a + b"), formula(" total = s * 2 ")];
        assert_eq!(answer_name(&formulas).as_deref(), Some("total"));
        assert_eq!(answer_name(&[]), None);
    }

    #[test]
    fn test_server_script() {
        let variables = vec![variable("a", 1.0, 10.0, 0), variable("b", 0.5, 2.3, 1)];
        let formulas = vec![formula("s = a + b"), formula("total = s * 2")];

        let script = server_script(&variables, &formulas, "total");

        assert_eq!(
            script,
            "import random\n\
             \n\
             def generate(data):\n    \
             a = random.randint(1, 10)\n    \
             b = random.randint(5, 23) / 10\n    \
             s = a + b\n    \
             total = s * 2\n    \
             data[\"params\"][\"a\"] = a\n    \
             data[\"params\"][\"b\"] = b\n    \
             data[\"correct_answers\"][\"total\"] = total\n"
        );
    }

    #[test]
    fn test_large_scale_does_not_overflow() {
        let variables = vec![variable("x", 1.0, 2.0, 19)];

        let script = server_script(&variables, &[formula("y = x")], "y");

        assert!(script.contains("    x = random.randint(10000000000000000000, 20000000000000000000) / 10000000000000000000\n"));
    }
}
