/// Generates deterministic seatings: entry `i` of a permutation is the agent
/// index placed in seat `i`.
pub struct SeatPermutations {
    permutations: Vec<Vec<usize>>,
}

impl SeatPermutations {
    pub fn new(agents: usize, count: usize) -> Self {
        let limit = count.min(Self::max_for(agents));
        let mut permutations = Vec::with_capacity(limit);
        let mut base: Vec<usize> = (0..agents).collect();
        if agents > 0 {
            generate(&mut base, 0, limit, &mut permutations);
        }
        Self { permutations }
    }

    /// Number of distinct seatings for `agents` agents.
    pub fn max_for(agents: usize) -> usize {
        (1..=agents).product::<usize>().max(1)
    }

    pub fn as_slice(&self) -> &[Vec<usize>] {
        &self.permutations
    }
}

fn generate(data: &mut [usize], start: usize, limit: usize, output: &mut Vec<Vec<usize>>) {
    if output.len() >= limit {
        return;
    }

    if start + 1 >= data.len() {
        output.push(data.to_vec());
        return;
    }

    for idx in start..data.len() {
        data.swap(start, idx);
        generate(data, start + 1, limit, output);
        data.swap(start, idx);
        if output.len() >= limit {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_identity_first() {
        let perms = SeatPermutations::new(4, 1);
        assert_eq!(perms.as_slice(), &[vec![0, 1, 2, 3]]);
    }

    #[test]
    fn caps_at_factorial() {
        assert_eq!(SeatPermutations::new(4, 100).as_slice().len(), 24);
        assert_eq!(SeatPermutations::new(2, 100).as_slice(), &[vec![0, 1], vec![1, 0]]);
        assert_eq!(SeatPermutations::max_for(5), 120);
    }

    #[test]
    fn seatings_are_distinct() {
        let perms = SeatPermutations::new(3, 6);
        let mut seen = perms.as_slice().to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }
}
