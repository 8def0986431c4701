use std::fmt;

use phf::phf_map;

/// 难度等级
///
/// 生成题目前选定，本轮测评内不可更改
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Difficulty {
    /// 初级
    Junior,
    /// 中级（配置界面默认选中）
    #[default]
    #[serde(rename = "Mid-Level")]
    Mid,
    /// 高级
    Senior,
}

/// 别名表（小写），包含菜单序号
static ALIASES: phf::Map<&'static str, Difficulty> = phf_map! {
    "1" => Difficulty::Junior,
    "junior" => Difficulty::Junior,
    "jr" => Difficulty::Junior,
    "2" => Difficulty::Mid,
    "mid" => Difficulty::Mid,
    "mid-level" => Difficulty::Mid,
    "middle" => Difficulty::Mid,
    "3" => Difficulty::Senior,
    "senior" => Difficulty::Senior,
    "sr" => Difficulty::Senior,
};

impl Difficulty {
    /// 按菜单顺序排列的全部难度
    pub const ALL: [Difficulty; 3] = [Difficulty::Junior, Difficulty::Mid, Difficulty::Senior];

    /// 获取标准名称
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Junior => "Junior",
            Difficulty::Mid => "Mid-Level",
            Difficulty::Senior => "Senior",
        }
    }

    /// 尝试从字符串解析难度（忽略大小写）
    pub fn from_str(s: &str) -> Option<Self> {
        ALIASES.get(s.trim().to_lowercase().as_str()).copied()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
