//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const TABLE: &str = "NetflixTVShowsAndMovies";

/// A small slice of the Netflix titles dataset. The last row has gaps.
pub const NETFLIX_CSV: &str = "\
index,title,type,release_year,age_certification,imdb_score
0,Taxi Driver,MOVIE,1976,R,8.3
1,Monty Python and the Holy Grail,MOVIE,1975,PG,8.2
2,Life of Brian,MOVIE,1979,R,8.0
3,The Exorcist,MOVIE,1973,R,8.1
4,Monty Python's Flying Circus,SHOW,1969,TV-14,8.8
5,Dogs of Berlin,SHOW,2018,TV-MA,7.3
6,Dark,SHOW,2017,TV-MA,8.7
7,Ozark,SHOW,2017,TV-MA,8.4
8,Bird Box,MOVIE,2018,R,6.6
9,The Irishman,MOVIE,2019,R,7.8
10,Untitled,,2020,,
";

/// Writes the fixture as `NetflixTVShowsAndMovies.csv` inside `dir`.
pub fn write_netflix_csv(dir: &Path) -> PathBuf {
    let path = dir.join(format!("{}.csv", TABLE));
    fs::write(&path, NETFLIX_CSV).unwrap();
    path
}

/// Writes a config file sending exports to `output_dir`.
pub fn write_config(dir: &Path, output_dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        format!("[output]\ndirectory = '{}'\nwidth = 640\nheight = 480\n", output_dir.display()),
    )
    .unwrap();
    path
}
