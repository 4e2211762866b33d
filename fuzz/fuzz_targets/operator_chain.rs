#![no_main]

use libfuzzer_sys::fuzz_target;
use lazyseq::Sequence;

// Fuzz target for chains of deferred operators.
// The first half of the input is the source data, the second half a list of
// operator codes. Every chain is checked against the same operations applied
// to a Vec.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let (source, ops) = data.split_at(data.len() / 2);
    let source: Vec<i32> = source.iter().map(|&b| i32::from(b)).collect();

    let mut seq = Sequence::from_vec(source.clone());
    let mut model = source;

    for pair in ops.chunks(2) {
        let op = pair[0] % 7;
        let arg = i64::from(*pair.get(1).unwrap_or(&0) % 16);
        match op {
            0 => {
                seq = seq.filter(move |v| i64::from(*v) % (arg + 1) == 0);
                model.retain(|v| i64::from(*v) % (arg + 1) == 0);
            }
            1 => {
                seq = seq.select(move |v| v.wrapping_add(arg as i32));
                model = model.into_iter().map(|v| v.wrapping_add(arg as i32)).collect();
            }
            2 => {
                seq = seq.skip(arg).unwrap();
                model = model.into_iter().skip(arg as usize).collect();
            }
            3 => {
                seq = seq.take(arg).unwrap();
                model.truncate(arg as usize);
            }
            4 => {
                seq = seq.distinct();
                let mut seen = std::collections::HashSet::new();
                model.retain(|v| seen.insert(*v));
            }
            5 => {
                let tail: Vec<i32> = (0..arg as i32).collect();
                seq = seq.concat(Sequence::from_vec(tail.clone()));
                model.extend(tail);
            }
            _ => {
                seq = seq.take_while(move |v| i64::from(*v) > arg);
                let keep = model.iter().take_while(|v| i64::from(**v) > arg).count();
                model.truncate(keep);
            }
        }
    }

    let out = seq.to_vec().unwrap();
    assert_eq!(out, model);

    seq.reset().unwrap();
    assert_eq!(seq.count().unwrap(), model.len());
});
