pub mod city;
pub mod enrichment;
