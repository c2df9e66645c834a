// ============================================
// src/shuffle.rs
// シャッフルと重複なしサンプリング
// ============================================

use rand::Rng;

/// Fisher–Yates でスライスをその場でシャッフルする
///
/// 末尾から 1 まで、`i` 番目と `[0, i]` の一様乱数位置を入れ替える。
/// 長さ 0 / 1 のときは何もしない。
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// `items` から重複なしで `k` 個を取り出す (部分 Fisher–Yates)
///
/// `k` が要素数より大きい場合は全要素を返す。
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], k: usize, rng: &mut R) -> Vec<T> {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    let take = k.min(indices.len());

    // 先頭 take 個だけ確定させればよい
    for i in 0..take {
        let j = rng.random_range(i..indices.len());
        indices.swap(i, j);
    }

    indices[..take].iter().map(|&idx| items[idx].clone()).collect()
}
