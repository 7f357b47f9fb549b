#![allow(dead_code)]

pub mod socket_guard;

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// TinySeq XML document with one sequence element.
#[must_use]
pub fn tinyseq_document(sequence: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
         <!DOCTYPE TSeqSet PUBLIC \"-//NCBI//NCBI TSeq/EN\" \"https://www.ncbi.nlm.nih.gov/dtd/NCBI_TSeq.dtd\">\n\
         <TSeqSet>\n<TSeq>\n  <TSeq_seqtype value=\"nucleotide\"/>\n  \
         <TSeq_accver>NC_000000.1</TSeq_accver>\n  \
         <TSeq_defline>synthetic test record</TSeq_defline>\n  \
         <TSeq_length>{}</TSeq_length>\n  \
         <TSeq_sequence>{sequence}</TSeq_sequence>\n</TSeq>\n</TSeqSet>\n",
        sequence.len()
    )
}

/// Gzip-compresses `data` in a single member.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Deterministic pseudo-random nucleotide text.
#[must_use]
pub fn nucleotides(len: usize) -> String {
    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];
    let mut state: u32 = 0x9E37_79B9;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            BASES[(state % 4) as usize]
        })
        .collect()
}
