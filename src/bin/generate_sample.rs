//! Writes a small synthetic price list (内用薬 / 外用薬 / 注射薬) into `data/`.
//!
//! The files mimic the column layout of the official exports, including the
//! unnamed-by-meaning marker columns in front of 品名. 外用薬 is written in
//! Shift_JIS and 内用薬 with a UTF-8 BOM so encoding detection gets exercised.

use std::path::Path;

use anyhow::{Context, Result};

const HEADERS: &[&str] = &[
    "区分",
    "薬価基準収載医薬品コード",
    "成分名",
    "規格",
    "麻薬",
    "毒薬",
    "劇薬",
    "品名",
    "メーカー名",
    "診療報酬において加算等の算定対象となる後発医薬品",
    "先発医薬品",
    "薬価",
];

const MAKERS: &[&str] = &["沢井製薬", "東和薬品", "日医工", "ニプロ", "第一三共エスファ", "共和薬品"];

/// (ingredient, spec, originator brand, marker, generic stem, base price)
type Product = (&'static str, &'static str, &'static str, &'static str, &'static str, f64);

const ORAL: &[Product] = &[
    ("アスピリン", "100mg1錠", "バイアスピリン錠100mg", "", "アスピリン腸溶錠100mg", 5.7),
    ("ロキソプロフェンナトリウム水和物", "60mg1錠", "ロキソニン錠60mg", "", "ロキソプロフェンNa錠60mg", 10.1),
    ("アセトアミノフェン", "200mg1錠", "カロナール錠200", "", "アセトアミノフェン錠200mg", 6.5),
    ("コデインリン酸塩水和物", "1%1g", "リン酸コデイン散1%", "麻", "コデインリン酸塩散1%", 8.9),
    ("アスピリン・ランソプラゾール", "1錠", "タケルダ配合錠", "", "", 94.6),
    ("アムロジピンベシル酸塩", "5mg1錠", "ノルバスク錠5mg", "", "アムロジピン錠5mg", 15.2),
];

const TOPICAL: &[Product] = &[
    ("ケトプロフェン", "20mg10cm×14cm1枚", "モーラステープ20mg", "", "ケトプロフェンテープ20mg", 25.1),
    ("ロキソプロフェンナトリウム水和物", "100mg1枚", "ロキソニンテープ100mg", "", "ロキソプロフェンNaテープ100mg", 24.4),
    ("ヘパリン類似物質", "0.3%1g", "ヒルドイドソフト軟膏0.3%", "", "ヘパリン類似物質油性クリーム0.3%", 18.5),
];

const INJECTION: &[Product] = &[
    ("モルヒネ塩酸塩水和物", "10mg1mL1管", "モルヒネ塩酸塩注射液10mg", "麻劇", "", 313.0),
    ("アセトアミノフェン", "1000mg100mL1袋", "アセリオ静注液1000mgバッグ", "", "アセトアミノフェン静注液1000mg", 1097.0),
    ("ヘパリンナトリウム", "5千単位5mL1瓶", "ヘパリンNa注5千単位/5mL", "", "", 512.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn split_markers(markers: &str) -> [String; 3] {
    let has = |m: char| if markers.contains(m) { m.to_string() } else { String::new() };
    [has('麻'), has('毒'), has('劇')]
}

fn build_rows(kind: &str, products: &[Product], rng: &mut SimpleRng) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut code = 1000u32;

    for &(ingredient, spec, brand, markers, generic_stem, price) in products {
        let [narcotic, poison, powerful] = split_markers(markers);

        code += 1;
        rows.push(vec![
            kind.to_string(),
            format!("{code:012}"),
            ingredient.to_string(),
            spec.to_string(),
            narcotic.clone(),
            poison.clone(),
            powerful.clone(),
            brand.to_string(),
            rng.pick(&["バイエル薬品", "第一三共", "あゆみ製薬", "塩野義製薬", "武田薬品工業"]).to_string(),
            String::new(),
            "先発品".to_string(),
            format!("{price:.1}"),
        ]);

        if generic_stem.is_empty() {
            continue;
        }
        let n_generics = 1 + (rng.next_u64() % 3) as usize;
        for _ in 0..n_generics {
            let maker = rng.pick(MAKERS);
            let short = maker.chars().take(2).collect::<String>();
            let discount = 0.4 + rng.next_f64() * 0.3;
            // Roughly half the generics carry the reimbursement star.
            let flag = if rng.next_u64() % 2 == 0 { "★" } else { "後発品" };
            code += 1;
            rows.push(vec![
                kind.to_string(),
                format!("{code:012}"),
                ingredient.to_string(),
                spec.to_string(),
                narcotic.clone(),
                poison.clone(),
                powerful.clone(),
                format!("{generic_stem}「{short}」"),
                maker.to_string(),
                flag.to_string(),
                String::new(),
                format!("{:.1}", price * discount),
            ]);
        }
    }
    rows
}

fn to_csv(rows: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer.into_inner().context("flushing CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);
    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).context("creating data/")?;

    let oral = to_csv(&build_rows("内", ORAL, &mut rng))?;
    let mut with_bom = b"\xEF\xBB\xBF".to_vec();
    with_bom.extend_from_slice(oral.as_bytes());
    write_file(&out_dir.join("内用薬.csv"), &with_bom)?;

    let topical = to_csv(&build_rows("外", TOPICAL, &mut rng))?;
    let (sjis, _, unmappable) = encoding_rs::SHIFT_JIS.encode(&topical);
    if unmappable {
        log::warn!("some characters in 外用薬 could not be encoded as Shift_JIS");
    }
    write_file(&out_dir.join("外用薬.csv"), &sjis)?;

    let injection = to_csv(&build_rows("注", INJECTION, &mut rng))?;
    write_file(&out_dir.join("注射薬.csv"), injection.as_bytes())?;

    Ok(())
}
