// Property tests for the stream command builder

use loopcast::engine::{DEFAULT_RTMP_HOST, Destination, LayoutMode, build_stream_args};
use proptest::prelude::*;
use std::path::PathBuf;

proptest! {
    #[test]
    fn args_are_deterministic(
        name in "[a-z0-9]{1,12}",
        key in "[A-Za-z0-9_-]{4,24}",
    ) {
        let input = PathBuf::from(format!("videos/{name}.mp4"));
        let dest = Destination::new(DEFAULT_RTMP_HOST, &key).unwrap();

        for layout in [LayoutMode::Standard, LayoutMode::Portrait] {
            prop_assert_eq!(
                build_stream_args(&input, &dest, layout),
                build_stream_args(&input, &dest, layout)
            );
        }
    }

    #[test]
    fn portrait_only_adds_the_scale_filter(
        name in "[a-z0-9]{1,12}",
        key in "[A-Za-z0-9_-]{4,24}",
    ) {
        let input = PathBuf::from(format!("videos/{name}.flv"));
        let dest = Destination::new(DEFAULT_RTMP_HOST, &key).unwrap();

        let standard = build_stream_args(&input, &dest, LayoutMode::Standard);
        let portrait = build_stream_args(&input, &dest, LayoutMode::Portrait);

        prop_assert_eq!(portrait.len(), standard.len() + 2);

        let stripped: Vec<String> = portrait
            .into_iter()
            .filter(|a| a != "-vf" && a != "scale=720:1280")
            .collect();
        prop_assert_eq!(stripped, standard);
    }

    #[test]
    fn endpoint_is_always_the_final_argument(
        name in "[a-z0-9]{1,12}",
        key in "[A-Za-z0-9_-]{4,24}",
        portrait in any::<bool>(),
    ) {
        let input = PathBuf::from(format!("videos/{name}.mp4"));
        let dest = Destination::new(DEFAULT_RTMP_HOST, &key).unwrap();
        let layout = if portrait { LayoutMode::Portrait } else { LayoutMode::Standard };

        let args = build_stream_args(&input, &dest, layout);
        prop_assert_eq!(args.last().unwrap(), &dest.url());
    }
}
