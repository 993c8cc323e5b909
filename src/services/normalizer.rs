//! 答案文本归一化
//!
//! 让"表面差异"（大小写、全角半角、平假名片假名、标点符号与空白）不造成误判

use crate::error::AppResult;
use phf::phf_map;
use regex::Regex;

/// 半角片假名 → 全角片假名
static HALFWIDTH_KATAKANA: phf::Map<char, char> = phf_map! {
    'ｦ' => 'ヲ', 'ｧ' => 'ァ', 'ｨ' => 'ィ', 'ｩ' => 'ゥ', 'ｪ' => 'ェ', 'ｫ' => 'ォ',
    'ｬ' => 'ャ', 'ｭ' => 'ュ', 'ｮ' => 'ョ', 'ｯ' => 'ッ', 'ｰ' => 'ー',
    'ｱ' => 'ア', 'ｲ' => 'イ', 'ｳ' => 'ウ', 'ｴ' => 'エ', 'ｵ' => 'オ',
    'ｶ' => 'カ', 'ｷ' => 'キ', 'ｸ' => 'ク', 'ｹ' => 'ケ', 'ｺ' => 'コ',
    'ｻ' => 'サ', 'ｼ' => 'シ', 'ｽ' => 'ス', 'ｾ' => 'セ', 'ｿ' => 'ソ',
    'ﾀ' => 'タ', 'ﾁ' => 'チ', 'ﾂ' => 'ツ', 'ﾃ' => 'テ', 'ﾄ' => 'ト',
    'ﾅ' => 'ナ', 'ﾆ' => 'ニ', 'ﾇ' => 'ヌ', 'ﾈ' => 'ネ', 'ﾉ' => 'ノ',
    'ﾊ' => 'ハ', 'ﾋ' => 'ヒ', 'ﾌ' => 'フ', 'ﾍ' => 'ヘ', 'ﾎ' => 'ホ',
    'ﾏ' => 'マ', 'ﾐ' => 'ミ', 'ﾑ' => 'ム', 'ﾒ' => 'メ', 'ﾓ' => 'モ',
    'ﾔ' => 'ヤ', 'ﾕ' => 'ユ', 'ﾖ' => 'ヨ',
    'ﾗ' => 'ラ', 'ﾘ' => 'リ', 'ﾙ' => 'ル', 'ﾚ' => 'レ', 'ﾛ' => 'ロ',
    'ﾜ' => 'ワ', 'ﾝ' => 'ン',
};

/// 全角片假名 + 浊点 → 浊音
static VOICED: phf::Map<char, char> = phf_map! {
    'カ' => 'ガ', 'キ' => 'ギ', 'ク' => 'グ', 'ケ' => 'ゲ', 'コ' => 'ゴ',
    'サ' => 'ザ', 'シ' => 'ジ', 'ス' => 'ズ', 'セ' => 'ゼ', 'ソ' => 'ゾ',
    'タ' => 'ダ', 'チ' => 'ヂ', 'ツ' => 'ヅ', 'テ' => 'デ', 'ト' => 'ド',
    'ハ' => 'バ', 'ヒ' => 'ビ', 'フ' => 'ブ', 'ヘ' => 'ベ', 'ホ' => 'ボ',
    'ウ' => 'ヴ',
};

/// 全角片假名 + 半浊点 → 半浊音
static SEMI_VOICED: phf::Map<char, char> = phf_map! {
    'ハ' => 'パ', 'ヒ' => 'ピ', 'フ' => 'プ', 'ヘ' => 'ペ', 'ホ' => 'ポ',
};

const HALFWIDTH_VOICED_MARK: char = 'ﾞ';
const HALFWIDTH_SEMI_VOICED_MARK: char = 'ﾟ';

/// 片假名与平假名的码位差
const KANA_OFFSET: u32 = 0x60;
/// 全角 ASCII 与半角 ASCII 的码位差
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

/// 单字符折叠：全角 ASCII → 半角，片假名 → 平假名，表意空格 → 空格
fn fold_char(c: char) -> char {
    match c {
        '\u{3000}' => ' ',
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - FULLWIDTH_OFFSET).unwrap_or(c),
        // ァ..ヶ，长音符 ー 两种假名通用
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c),
        _ => c,
    }
}

/// 文本归一化器
///
/// 持有编译好的正则，构造一次后可在多个请求间复用
#[derive(Debug, Clone)]
pub struct Normalizer {
    /// 标点、符号与空白
    separators: Regex,
    /// 词
    words: Regex,
}

impl Normalizer {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            separators: Regex::new(r"[\p{P}\p{S}\s]+")?,
            words: Regex::new(r"\w+")?,
        })
    }

    /// 折叠书写变体并转小写，保留标点和空白
    pub fn fold(&self, text: &str) -> String {
        let mut widened = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let Some(&base) = HALFWIDTH_KATAKANA.get(&c) else {
                widened.push(c);
                continue;
            };
            let combined = match chars.peek() {
                Some(&HALFWIDTH_VOICED_MARK) => VOICED.get(&base).copied(),
                Some(&HALFWIDTH_SEMI_VOICED_MARK) => SEMI_VOICED.get(&base).copied(),
                _ => None,
            };
            match combined {
                Some(kana) => {
                    chars.next();
                    widened.push(kana);
                }
                None => widened.push(base),
            }
        }

        widened.chars().map(fold_char).flat_map(char::to_lowercase).collect()
    }

    /// 完整归一化：折叠后去掉所有标点、符号和空白
    pub fn normalize(&self, text: &str) -> String {
        self.separators.replace_all(&self.fold(text), "").into_owned()
    }

    /// 分词：折叠后按标点、符号和空白切分，只保留长度不小于 `min_chars` 的词
    pub fn tokenize(&self, text: &str, min_chars: usize) -> Vec<String> {
        let folded = self.fold(text);
        let spaced = self.separators.replace_all(&folded, " ");
        self.words
            .find_iter(&spaced)
            .map(|m| m.as_str().to_string())
            .filter(|token| token.chars().count() >= min_chars)
            .collect()
    }
}
