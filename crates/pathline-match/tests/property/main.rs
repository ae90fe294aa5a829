mod match_properties;
