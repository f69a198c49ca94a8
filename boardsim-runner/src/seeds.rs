use anyhow::{Result, bail};
use boardsim_game::constants::DEFAULT_SEED;

/// Resolve CLI seed tokens into batch seeds.
///
/// Accepts decimal integers (negative values use their magnitude) and
/// `0x`-prefixed hex. Duplicates are dropped, keeping the first occurrence.
/// No tokens at all yields the default seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let seed = if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            match u64::from_str_radix(hex, 16) {
                Ok(value) => value,
                Err(_) => bail!("invalid hex seed '{token}'"),
            }
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else {
            bail!("invalid seed '{token}' (expected an integer or 0x-prefixed hex)");
        };
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_decimal_hex_and_negative_seeds() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "0x10", "-7"])).unwrap();
        assert_eq!(seeds, vec![42, 16, 7]);
    }

    #[test]
    fn duplicates_collapse_in_order() {
        let seeds = resolve_seed_inputs(&tokens(&["5", "0x5", "9", "5"])).unwrap();
        assert_eq!(seeds, vec![5, 9]);
    }

    #[test]
    fn empty_input_uses_default_seed() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0xZZ"])).is_err());
    }
}
