use std::collections::{HashMap, HashSet};
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::error::{Error, Result};

/// 排列生成算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// 交换回溯（递归）
    Backtracking,
    /// Heap 算法（迭代）
    Heap,
    /// 前缀/剩余字符递归
    Prefix,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Backtracking, Strategy::Heap, Strategy::Prefix];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Backtracking => "backtracking",
            Strategy::Heap => "heap",
            Strategy::Prefix => "prefix",
        }
    }

    /// 生成原始排列序列（可能包含重复）
    pub fn run(&self, input: &str) -> Vec<String> {
        match self {
            Strategy::Backtracking => swap_backtracking(input),
            Strategy::Heap => heap_iterative(input),
            Strategy::Prefix => prefix_remainder(input),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Backtracking
    }
}

/// 结果向量预分配的上限，超出部分随生成逐步增长
const MAX_PREALLOCATED: usize = 1 << 16;

/// 字符串排列生成器
#[derive(Debug, Clone, Copy)]
pub struct PermutationGenerator {
    include_duplicates: bool,
}

impl PermutationGenerator {
    pub fn new(include_duplicates: bool) -> Self {
        Self { include_duplicates }
    }

    pub fn includes_duplicates(&self) -> bool {
        self.include_duplicates
    }

    /// 使用指定算法生成 `input` 的全部排列
    ///
    /// `input` 为 `None` 时返回 [`Error::InvalidArgument`]；空字符串总是得到 `[""]`。
    /// 不包含重复项时，结果按首次出现顺序去重。
    pub fn generate(&self, input: Option<&str>, strategy: Strategy) -> Result<Vec<String>> {
        let input = input.ok_or_else(|| Error::invalid("输入字符串不能为 null"))?;

        let raw = strategy.run(input);
        if self.include_duplicates {
            Ok(raw)
        } else {
            Ok(dedup_preserving_order(raw))
        }
    }

    pub fn generate_backtracking(&self, input: Option<&str>) -> Result<Vec<String>> {
        self.generate(input, Strategy::Backtracking)
    }

    pub fn generate_heap(&self, input: Option<&str>) -> Result<Vec<String>> {
        self.generate(input, Strategy::Heap)
    }

    pub fn generate_prefix(&self, input: Option<&str>) -> Result<Vec<String>> {
        self.generate(input, Strategy::Prefix)
    }
}

impl Default for PermutationGenerator {
    fn default() -> Self {
        Self::new(true)
    }
}

/// 交换回溯：逐个固定位置，尝试把后续每个字符换到当前位置，递归后再换回
pub fn swap_backtracking(input: &str) -> Vec<String> {
    let mut chars: Vec<char> = input.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }

    let mut result = Vec::with_capacity(initial_capacity(chars.len()));
    backtrack(&mut chars, 0, &mut result);
    result
}

fn backtrack(chars: &mut [char], index: usize, result: &mut Vec<String>) {
    if index == chars.len() - 1 {
        result.push(chars.iter().collect());
        return;
    }

    for i in index..chars.len() {
        chars.swap(index, i);
        backtrack(chars, index + 1, result);
        chars.swap(index, i);
    }
}

/// Heap 算法（迭代版）
pub fn heap_iterative(input: &str) -> Vec<String> {
    let mut chars: Vec<char> = input.chars().collect();
    let n = chars.len();
    if n == 0 {
        return vec![String::new()];
    }

    let mut result = Vec::with_capacity(initial_capacity(n));
    let mut counters = vec![0usize; n];

    result.push(chars.iter().collect());

    let mut i = 0;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                chars.swap(0, i);
            } else {
                chars.swap(counters[i], i);
            }
            result.push(chars.iter().collect());
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }

    result
}

/// 前缀/剩余字符递归：每次从剩余字符中取一个追加到前缀
pub fn prefix_remainder(input: &str) -> Vec<String> {
    let mut remaining: Vec<char> = input.chars().collect();
    let mut prefix = String::with_capacity(input.len());
    let mut result = Vec::with_capacity(initial_capacity(remaining.len()));

    extend_prefix(&mut prefix, &mut remaining, &mut result);
    result
}

fn extend_prefix(prefix: &mut String, remaining: &mut Vec<char>, result: &mut Vec<String>) {
    if remaining.is_empty() {
        result.push(prefix.clone());
        return;
    }

    for i in 0..remaining.len() {
        let c = remaining.remove(i);
        prefix.push(c);
        extend_prefix(prefix, remaining, result);
        prefix.pop();
        remaining.insert(i, c);
    }
}

/// 去重并保留首次出现的顺序
pub fn dedup_preserving_order(permutations: Vec<String>) -> Vec<String> {
    let keep: Vec<bool> = {
        let mut seen: HashSet<&str> = HashSet::with_capacity(permutations.len());
        permutations.iter().map(|p| seen.insert(p.as_str())).collect()
    };

    permutations
        .into_iter()
        .zip(keep)
        .filter_map(|(p, first)| first.then_some(p))
        .collect()
}

fn initial_capacity(len: usize) -> usize {
    factorial(len).min(MAX_PREALLOCATED)
}

/// 不重复排列的数量: n! / (m1! * ... * mk!)
pub fn distinct_count(input: &str) -> usize {
    let chars: Vec<char> = input.chars().collect();
    let mut multiplicities = HashMap::new();
    for c in &chars {
        *multiplicities.entry(*c).or_insert(0usize) += 1;
    }

    multiplicities
        .values()
        .fold(factorial(chars.len()), |acc, &m| acc / factorial(m))
}

/// n!，溢出时饱和到 `usize::MAX`
pub fn factorial(n: usize) -> usize {
    (1..=n).fold(1usize, |acc, k| acc.saturating_mul(k))
}
